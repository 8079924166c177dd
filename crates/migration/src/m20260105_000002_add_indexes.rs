use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listings sort and search on the display name
        manager
            .create_index(
                Index::create()
                    .name("idx_student_nm_siswa")
                    .table(Student::Table)
                    .col(Student::NmSiswa)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pendaftar_nm_lengkap")
                    .table(Pendaftar::Table)
                    .col(Pendaftar::NmLengkap)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sekolah_sekolah")
                    .table(Sekolah::Table)
                    .col(Sekolah::Sekolah)
                    .to_owned(),
            )
            .await?;

        // School-of-origin lookup by kecamatan code
        manager
            .create_index(
                Index::create()
                    .name("idx_sekolah_kode_kec")
                    .table(Sekolah::Table)
                    .col(Sekolah::KodeKec)
                    .to_owned(),
            )
            .await?;

        // At most one academic year may be active
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_tahun_ajaran_single_active
                 ON tahun_ajaran (is_aktif) WHERE is_aktif;",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS idx_tahun_ajaran_single_active;")
            .await?;

        for name in [
            "idx_sekolah_kode_kec",
            "idx_sekolah_sekolah",
            "idx_pendaftar_nm_lengkap",
            "idx_student_nm_siswa",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}

#[derive(Iden)]
enum Student {
    Table,
    NmSiswa,
}

#[derive(Iden)]
enum Pendaftar {
    Table,
    NmLengkap,
}

#[derive(Iden)]
enum Sekolah {
    Table,
    Sekolah,
    KodeKec,
}
