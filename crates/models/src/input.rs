//! Request payloads accepted by the admin services
//!
//! Every payload is validated once at the boundary: blank strings are turned
//! into `None` by `normalized()`, and `validate()` checks the single required
//! field each entity has. Dates arrive as strings and are parsed here so the
//! services only ever see typed values.

use crate::{keterangan::VerificationStatus, tahap::Tahap};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Date formats accepted from forms and spreadsheets
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Datetime formats accepted from `datetime-local` inputs
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Treats empty and whitespace-only strings as absent
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

/// Parses an optional date field, naming the field in the error message
pub fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    let Some(value) = value else {
        return Ok(None);
    };

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .map(Some)
        .ok_or_else(|| format!("Format tanggal tidak valid untuk {field}: {value}"))
}

/// Parses an optional timestamp field. RFC 3339 values are converted to UTC,
/// naive values are taken as-is, and a bare date means midnight.
pub fn parse_datetime(field: &str, value: Option<&str>) -> Result<Option<NaiveDateTime>, String> {
    let Some(value) = value else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(dt.naive_utc()));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .map(Some)
        .ok_or_else(|| format!("Format waktu tidak valid untuk {field}: {value}"))
}

/// Spreadsheet cells come through as strings, numbers or booleans depending on
/// how the sheet was typed, so accept any scalar and keep its text form
fn loose_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Distinguishes a field that was omitted (`None`) from one explicitly set to null (`Some(None)`)
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Full student record as edited in the dashboard
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentInput {
    pub id: Option<String>,
    // Identity
    pub nm_siswa: Option<String>,
    pub nis: Option<String>,
    pub nisn: Option<String>,
    pub no_daftar: Option<String>,
    pub tempat_lahir: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub jenis_kelamin: Option<String>,
    pub agama: Option<String>,
    pub alamat_siswa: Option<String>,
    pub telepon_siswa: Option<String>,
    // Parents
    pub nm_ayah: Option<String>,
    pub nm_ibu: Option<String>,
    pub pekerjaan_ayah: Option<String>,
    pub pekerjaan_ibu: Option<String>,
    pub nm_wali: Option<String>,
    pub pekerjaan_wali: Option<String>,
    pub alamat_ortu: Option<String>,
    pub telepon_ortu: Option<String>,
    pub alamat_wali: Option<String>,
    pub telepon_wali: Option<String>,
    // Supplementary
    pub status_dalam_kel: Option<String>,
    pub anak_ke: Option<String>,
    pub sekolah_asal: Option<String>,
    pub diterima_kelas: Option<String>,
    pub diterima_tanggal: Option<String>,
    pub foto_siswa: Option<String>,
    pub no_ijasahnas: Option<String>,
    pub tgl_lulus: Option<String>,
    pub no_transkrip: Option<String>,
    pub tahun_ajaran: Option<String>,
}

impl StudentInput {
    pub fn normalized(self) -> Self {
        Self {
            id: blank_to_none(self.id),
            nm_siswa: blank_to_none(self.nm_siswa),
            nis: blank_to_none(self.nis),
            nisn: blank_to_none(self.nisn),
            no_daftar: blank_to_none(self.no_daftar),
            tempat_lahir: blank_to_none(self.tempat_lahir),
            tanggal_lahir: blank_to_none(self.tanggal_lahir),
            jenis_kelamin: blank_to_none(self.jenis_kelamin),
            agama: blank_to_none(self.agama),
            alamat_siswa: blank_to_none(self.alamat_siswa),
            telepon_siswa: blank_to_none(self.telepon_siswa),
            nm_ayah: blank_to_none(self.nm_ayah),
            nm_ibu: blank_to_none(self.nm_ibu),
            pekerjaan_ayah: blank_to_none(self.pekerjaan_ayah),
            pekerjaan_ibu: blank_to_none(self.pekerjaan_ibu),
            nm_wali: blank_to_none(self.nm_wali),
            pekerjaan_wali: blank_to_none(self.pekerjaan_wali),
            alamat_ortu: blank_to_none(self.alamat_ortu),
            telepon_ortu: blank_to_none(self.telepon_ortu),
            alamat_wali: blank_to_none(self.alamat_wali),
            telepon_wali: blank_to_none(self.telepon_wali),
            status_dalam_kel: blank_to_none(self.status_dalam_kel),
            anak_ke: blank_to_none(self.anak_ke),
            sekolah_asal: blank_to_none(self.sekolah_asal),
            diterima_kelas: blank_to_none(self.diterima_kelas),
            diterima_tanggal: blank_to_none(self.diterima_tanggal),
            foto_siswa: blank_to_none(self.foto_siswa),
            no_ijasahnas: blank_to_none(self.no_ijasahnas),
            tgl_lulus: blank_to_none(self.tgl_lulus),
            no_transkrip: blank_to_none(self.no_transkrip),
            tahun_ajaran: blank_to_none(self.tahun_ajaran),
        }
    }

    /// Returns the student's name, which is the only required field
    pub fn validate(&self) -> Result<&str, String> {
        self.nm_siswa
            .as_deref()
            .ok_or_else(|| "Nama Siswa tidak boleh kosong".to_owned())
    }
}

/// One row of a student spreadsheet, keyed by the sheet's header row
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct StudentImportRow {
    #[serde(deserialize_with = "loose_string")]
    pub nis: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub nisn: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub no_daftar: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub nm_siswa: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub tempat_lahir: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub tanggal_lahir: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub jenis_kelamin: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub agama: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub alamat_siswa: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub telepon_siswa: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub diterima_tanggal: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub nm_ayah: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub nm_ibu: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub pekerjaan_ayah: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub pekerjaan_ibu: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub nm_wali: Option<String>,
    #[serde(deserialize_with = "loose_string")]
    pub pekerjaan_wali: Option<String>,
}

impl StudentImportRow {
    pub fn normalized(self) -> Self {
        Self {
            nis: blank_to_none(self.nis),
            nisn: blank_to_none(self.nisn),
            no_daftar: blank_to_none(self.no_daftar),
            nm_siswa: blank_to_none(self.nm_siswa),
            tempat_lahir: blank_to_none(self.tempat_lahir),
            tanggal_lahir: blank_to_none(self.tanggal_lahir),
            jenis_kelamin: blank_to_none(self.jenis_kelamin),
            agama: blank_to_none(self.agama),
            alamat_siswa: blank_to_none(self.alamat_siswa),
            telepon_siswa: blank_to_none(self.telepon_siswa),
            diterima_tanggal: blank_to_none(self.diterima_tanggal),
            nm_ayah: blank_to_none(self.nm_ayah),
            nm_ibu: blank_to_none(self.nm_ibu),
            pekerjaan_ayah: blank_to_none(self.pekerjaan_ayah),
            pekerjaan_ibu: blank_to_none(self.pekerjaan_ibu),
            nm_wali: blank_to_none(self.nm_wali),
            pekerjaan_wali: blank_to_none(self.pekerjaan_wali),
        }
    }

    pub fn validate(&self) -> Result<&str, String> {
        self.nm_siswa
            .as_deref()
            .ok_or_else(|| "Nama Siswa tidak boleh kosong".to_owned())
    }
}

/// Registrant record as edited in the dashboard
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct PendaftarInput {
    pub id: Option<String>,
    pub nm_lengkap: Option<String>,
    pub tempat_lahir: Option<String>,
    pub tanggal_lahir: Option<String>,
    pub alamat: Option<String>,
    pub asal_sekolah: Option<String>,
    pub no_handphone: Option<String>,
    pub tahun_lulus: Option<String>,
    pub jalur_masuk: Option<String>,
    pub keterangan: Option<String>,
    pub tahap: Option<String>,
    pub tahun_ajaran: Option<String>,
}

impl PendaftarInput {
    pub fn normalized(self) -> Self {
        Self {
            id: blank_to_none(self.id),
            nm_lengkap: blank_to_none(self.nm_lengkap),
            tempat_lahir: blank_to_none(self.tempat_lahir),
            tanggal_lahir: blank_to_none(self.tanggal_lahir),
            alamat: blank_to_none(self.alamat),
            asal_sekolah: blank_to_none(self.asal_sekolah),
            no_handphone: blank_to_none(self.no_handphone),
            tahun_lulus: blank_to_none(self.tahun_lulus),
            jalur_masuk: blank_to_none(self.jalur_masuk),
            keterangan: blank_to_none(self.keterangan),
            tahap: blank_to_none(self.tahap),
            tahun_ajaran: blank_to_none(self.tahun_ajaran),
        }
    }

    pub fn validate(&self) -> Result<&str, String> {
        self.nm_lengkap
            .as_deref()
            .ok_or_else(|| "Nama Lengkap tidak boleh kosong".to_owned())
    }

    pub fn keterangan(&self) -> Result<Option<VerificationStatus>, String> {
        self.keterangan.as_deref().map(str::parse).transpose()
    }

    pub fn tahap(&self) -> Result<Option<Tahap>, String> {
        self.tahap.as_deref().map(str::parse).transpose()
    }
}

/// School reference row, either from the dashboard or from the school directory API
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(default)]
pub struct SekolahInput {
    pub id: Option<String>,
    pub kode_prop: Option<String>,
    pub propinsi: Option<String>,
    pub kode_kab_kota: Option<String>,
    pub kabupaten_kota: Option<String>,
    pub kode_kec: Option<String>,
    pub kecamatan: Option<String>,
    pub npsn: Option<String>,
    pub sekolah: Option<String>,
    pub bentuk: Option<String>,
    pub status: Option<String>,
    pub alamat_jalan: Option<String>,
    pub lintang: Option<String>,
    pub bujur: Option<String>,
}

impl SekolahInput {
    pub fn normalized(self) -> Self {
        Self {
            id: blank_to_none(self.id),
            kode_prop: blank_to_none(self.kode_prop),
            propinsi: blank_to_none(self.propinsi),
            kode_kab_kota: blank_to_none(self.kode_kab_kota),
            kabupaten_kota: blank_to_none(self.kabupaten_kota),
            kode_kec: blank_to_none(self.kode_kec),
            kecamatan: blank_to_none(self.kecamatan),
            npsn: blank_to_none(self.npsn),
            sekolah: blank_to_none(self.sekolah),
            bentuk: blank_to_none(self.bentuk),
            status: blank_to_none(self.status),
            alamat_jalan: blank_to_none(self.alamat_jalan),
            lintang: blank_to_none(self.lintang),
            bujur: blank_to_none(self.bujur),
        }
    }

    pub fn validate(&self) -> Result<&str, String> {
        self.sekolah
            .as_deref()
            .ok_or_else(|| "Nama Sekolah tidak boleh kosong".to_owned())
    }
}

/// A single graduation outcome for one student
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct KelulusanInput {
    pub student_id: String,
    pub jalur: Option<String>,
    pub status: String,
    pub tahap: String,
}

impl KelulusanInput {
    pub fn normalized(self) -> Self {
        Self {
            student_id: self.student_id.trim().to_owned(),
            jalur: blank_to_none(self.jalur),
            status: self.status.trim().to_owned(),
            tahap: self.tahap.trim().to_owned(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.student_id.is_empty() {
            return Err("Siswa harus dipilih".to_owned());
        }
        validate_outcome(&self.status, &self.tahap)
    }
}

/// Partial update of a graduation row; absent fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct KelulusanUpdate {
    #[serde(deserialize_with = "double_option")]
    pub jalur: Option<Option<String>>,
    pub status: Option<String>,
    pub tahap: Option<String>,
}

/// The same outcome applied to many students at once
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct BulkKelulusanInput {
    pub student_ids: Vec<String>,
    pub jalur: Option<String>,
    pub status: String,
    pub tahap: String,
}

impl BulkKelulusanInput {
    pub fn normalized(self) -> Self {
        Self {
            student_ids: self
                .student_ids
                .into_iter()
                .filter_map(|id| blank_to_none(Some(id)))
                .collect(),
            jalur: blank_to_none(self.jalur),
            status: self.status.trim().to_owned(),
            tahap: self.tahap.trim().to_owned(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        validate_outcome(&self.status, &self.tahap)
    }
}

fn validate_outcome(status: &str, tahap: &str) -> Result<(), String> {
    if status.is_empty() {
        return Err("Status kelulusan tidak boleh kosong".to_owned());
    }
    if tahap.is_empty() {
        return Err("Tahap tidak boleh kosong".to_owned());
    }
    Ok(())
}

/// A new academic year
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TahunAjaranInput {
    pub tahun: String,
    pub tahap: Option<String>,
    pub tanggal_pengumuman: Option<String>,
}

impl TahunAjaranInput {
    pub fn validate(&self) -> Result<(), String> {
        if self.tahun.trim().is_empty() {
            return Err("Tahun ajaran tidak boleh kosong".to_owned());
        }
        Ok(())
    }

    pub fn tanggal_pengumuman(&self) -> Result<Option<NaiveDateTime>, String> {
        let raw = blank_to_none(self.tanggal_pengumuman.clone());
        parse_datetime("tanggalPengumuman", raw.as_deref())
    }
}

/// Partial update of an academic year; an explicit null clears the announcement date
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct TahunAjaranUpdate {
    pub tahun: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub tahap: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub tanggal_pengumuman: Option<Option<String>>,
}

impl TahunAjaranUpdate {
    pub fn tanggal_pengumuman(&self) -> Result<Option<Option<NaiveDateTime>>, String> {
        self.tanggal_pengumuman
            .as_ref()
            .map(|value| {
                let raw = blank_to_none(value.clone());
                parse_datetime("tanggalPengumuman", raw.as_deref())
            })
            .transpose()
    }
}
