pub mod kelulusan;
pub mod pendaftar;
pub mod sekolah;
pub mod setting;
pub mod student;
pub mod tahun_ajaran;
pub mod user;
