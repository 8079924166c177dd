use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create student table
        manager
            .create_table(
                Table::create()
                    .table(Student::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Student::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Student::Nis).text())
                    .col(ColumnDef::new(Student::Nisn).text().unique_key())
                    .col(ColumnDef::new(Student::NoDaftar).text())
                    .col(ColumnDef::new(Student::NmSiswa).text().not_null())
                    .col(ColumnDef::new(Student::TempatLahir).text())
                    .col(ColumnDef::new(Student::TanggalLahir).date())
                    .col(ColumnDef::new(Student::JenisKelamin).text())
                    .col(ColumnDef::new(Student::Agama).text())
                    .col(ColumnDef::new(Student::AlamatSiswa).text())
                    .col(ColumnDef::new(Student::TeleponSiswa).text())
                    .col(ColumnDef::new(Student::DiterimaTanggal).date())
                    .col(ColumnDef::new(Student::NmAyah).text())
                    .col(ColumnDef::new(Student::NmIbu).text())
                    .col(ColumnDef::new(Student::PekerjaanAyah).text())
                    .col(ColumnDef::new(Student::PekerjaanIbu).text())
                    .col(ColumnDef::new(Student::NmWali).text())
                    .col(ColumnDef::new(Student::PekerjaanWali).text())
                    .col(ColumnDef::new(Student::StatusDalamKel).text())
                    .col(ColumnDef::new(Student::AnakKe).text())
                    .col(ColumnDef::new(Student::SekolahAsal).text())
                    .col(ColumnDef::new(Student::DiterimaKelas).text())
                    .col(ColumnDef::new(Student::AlamatOrtu).text())
                    .col(ColumnDef::new(Student::TeleponOrtu).text())
                    .col(ColumnDef::new(Student::AlamatWali).text())
                    .col(ColumnDef::new(Student::TeleponWali).text())
                    .col(ColumnDef::new(Student::FotoSiswa).text())
                    .col(ColumnDef::new(Student::NoIjasahnas).text())
                    .col(ColumnDef::new(Student::TglLulus).date())
                    .col(ColumnDef::new(Student::NoTranskrip).text())
                    .col(ColumnDef::new(Student::TahunAjaran).text())
                    .col(timestamp(Student::CreatedAt))
                    .col(timestamp(Student::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create kelulusan table, one row per student at most
        manager
            .create_table(
                Table::create()
                    .table(Kelulusan::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Kelulusan::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Kelulusan::StudentId)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Kelulusan::Jalur).text())
                    .col(ColumnDef::new(Kelulusan::Status).text().not_null())
                    .col(ColumnDef::new(Kelulusan::Tahap).text().not_null())
                    .col(timestamp(Kelulusan::CreatedAt))
                    .col(timestamp(Kelulusan::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-kelulusan-student_id")
                            .from(Kelulusan::Table, Kelulusan::StudentId)
                            .to(Student::Table, Student::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create pendaftar table
        manager
            .create_table(
                Table::create()
                    .table(Pendaftar::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pendaftar::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Pendaftar::NmLengkap).text().not_null())
                    .col(ColumnDef::new(Pendaftar::TempatLahir).text())
                    .col(ColumnDef::new(Pendaftar::TanggalLahir).date())
                    .col(ColumnDef::new(Pendaftar::Alamat).text())
                    .col(ColumnDef::new(Pendaftar::AsalSekolah).text())
                    .col(ColumnDef::new(Pendaftar::NoHandphone).text())
                    .col(ColumnDef::new(Pendaftar::TahunLulus).text())
                    .col(ColumnDef::new(Pendaftar::JalurMasuk).text())
                    .col(ColumnDef::new(Pendaftar::Keterangan).text())
                    .col(ColumnDef::new(Pendaftar::Tahap).text())
                    .col(ColumnDef::new(Pendaftar::TahunAjaran).text())
                    .col(timestamp(Pendaftar::CreatedAt))
                    .col(timestamp(Pendaftar::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create sekolah table; ids come from the school directory
        manager
            .create_table(
                Table::create()
                    .table(Sekolah::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sekolah::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Sekolah::KodeProp).text())
                    .col(ColumnDef::new(Sekolah::Propinsi).text())
                    .col(ColumnDef::new(Sekolah::KodeKabKota).text())
                    .col(ColumnDef::new(Sekolah::KabupatenKota).text())
                    .col(ColumnDef::new(Sekolah::KodeKec).text())
                    .col(ColumnDef::new(Sekolah::Kecamatan).text())
                    .col(ColumnDef::new(Sekolah::Npsn).text())
                    .col(ColumnDef::new(Sekolah::Sekolah).text())
                    .col(ColumnDef::new(Sekolah::Bentuk).text())
                    .col(ColumnDef::new(Sekolah::Status).text())
                    .col(ColumnDef::new(Sekolah::AlamatJalan).text())
                    .col(ColumnDef::new(Sekolah::Lintang).text())
                    .col(ColumnDef::new(Sekolah::Bujur).text())
                    .to_owned(),
            )
            .await?;

        // Create tahun_ajaran table
        manager
            .create_table(
                Table::create()
                    .table(TahunAjaran::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TahunAjaran::Id)
                            .text()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TahunAjaran::Tahun)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TahunAjaran::Tahap).text())
                    .col(ColumnDef::new(TahunAjaran::TanggalPengumuman).timestamp())
                    .col(
                        ColumnDef::new(TahunAjaran::IsAktif)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(timestamp(TahunAjaran::CreatedAt))
                    .col(timestamp(TahunAjaran::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // Create setting table
        manager
            .create_table(
                Table::create()
                    .table(Setting::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Setting::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(Setting::TanggalPengumuman).timestamp())
                    .col(ColumnDef::new(Setting::TahunAjaran).text())
                    .col(timestamp(Setting::CreatedAt))
                    .col(timestamp(Setting::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // The authentication provider normally owns this table
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(User::Id).text().not_null().primary_key())
                    .col(ColumnDef::new(User::Name).text().not_null())
                    .col(ColumnDef::new(User::Email).text().not_null().unique_key())
                    .col(ColumnDef::new(User::Role).text())
                    .col(ColumnDef::new(User::Banned).boolean())
                    .col(timestamp(User::CreatedAt))
                    .col(timestamp(User::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order to handle foreign key constraints
        manager
            .drop_table(Table::drop().table(Kelulusan::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Student::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Pendaftar::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sekolah::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(TahunAjaran::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Setting::Table).to_owned())
            .await?;

        // `user` stays, it belongs to the authentication provider
        Ok(())
    }
}

fn timestamp<T: IntoIden>(name: T) -> ColumnDef {
    ColumnDef::new(name)
        .timestamp()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(Iden)]
enum Student {
    Table,
    Id,
    Nis,
    Nisn,
    NoDaftar,
    NmSiswa,
    TempatLahir,
    TanggalLahir,
    JenisKelamin,
    Agama,
    AlamatSiswa,
    TeleponSiswa,
    DiterimaTanggal,
    NmAyah,
    NmIbu,
    PekerjaanAyah,
    PekerjaanIbu,
    NmWali,
    PekerjaanWali,
    StatusDalamKel,
    AnakKe,
    SekolahAsal,
    DiterimaKelas,
    AlamatOrtu,
    TeleponOrtu,
    AlamatWali,
    TeleponWali,
    FotoSiswa,
    NoIjasahnas,
    TglLulus,
    NoTranskrip,
    TahunAjaran,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Kelulusan {
    Table,
    Id,
    StudentId,
    Jalur,
    Status,
    Tahap,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Pendaftar {
    Table,
    Id,
    NmLengkap,
    TempatLahir,
    TanggalLahir,
    Alamat,
    AsalSekolah,
    NoHandphone,
    TahunLulus,
    JalurMasuk,
    Keterangan,
    Tahap,
    TahunAjaran,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Sekolah {
    Table,
    Id,
    KodeProp,
    Propinsi,
    KodeKabKota,
    KabupatenKota,
    KodeKec,
    Kecamatan,
    Npsn,
    Sekolah,
    Bentuk,
    Status,
    AlamatJalan,
    Lintang,
    Bujur,
}

#[derive(Iden)]
enum TahunAjaran {
    Table,
    Id,
    Tahun,
    Tahap,
    TanggalPengumuman,
    IsAktif,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Setting {
    Table,
    Id,
    TanggalPengumuman,
    TahunAjaran,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Name,
    Email,
    Role,
    Banned,
    CreatedAt,
    UpdatedAt,
}
