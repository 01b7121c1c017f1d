use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

/// A schema script owned by one slice. Scripts must be idempotent
/// (`DEFINE ... IF NOT EXISTS`) because the bootstrap one runs on every start.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Migration {
    pub slice: &'static str,
    pub version: &'static str,
    pub script: &'static str,
}

/// Applied in order. The first entry creates the `migration` table itself.
const MIGRATIONS: &[Migration] = &[
    Migration { slice: "core", version: "0001", script: include_str!("../migrations/0001_core.surql") },
    Migration {
        slice: "vehicles",
        version: "0001",
        script: include_str!("../migrations/0001_vehicles.surql"),
    },
    Migration {
        slice: "brands",
        version: "0001",
        script: include_str!("../migrations/0001_brands.surql"),
    },
    Migration { slice: "media", version: "0001", script: include_str!("../migrations/0001_media.surql") },
    Migration {
        slice: "inquiries",
        version: "0001",
        script: include_str!("../migrations/0001_inquiries.surql"),
    },
    Migration {
        slice: "vehicles",
        version: "0002",
        script: include_str!("../migrations/0002_vehicles.surql"),
    },
];

impl Migration {
    fn key(&self) -> String {
        format!("{}:{}", self.slice, self.version)
    }

    pub(crate) fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.script.as_bytes()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStep {
    pub slice: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<MigrationStep>,
    pub skipped: Vec<MigrationStep>,
}

#[derive(Debug, SurrealValue)]
struct AppliedMigration {
    slice: String,
    version: String,
    checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner {
    db: Surreal<Any>,
}

impl MigrationRunner {
    #[must_use]
    pub(crate) const fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        self.run_with(MIGRATIONS).await
    }

    async fn run_with(&self, migrations: &[Migration]) -> Result<MigrationReport, DatabaseError> {
        let mut report = MigrationReport::default();

        if let Some(bootstrap) = migrations.first() {
            self.db
                .query(bootstrap.script)
                .await
                .context("Bootstrapping migration table")?
                .check()
                .map_err(surrealdb::Error::from)?;
        }

        let applied = self.applied().await?;

        for migration in migrations {
            let step = MigrationStep { slice: migration.slice, version: migration.version };
            let checksum = migration.checksum();

            if let Some(existing) = applied.get(&migration.key()) {
                if existing.checksum != checksum {
                    return Err(DatabaseError::Migration {
                        message: format!(
                            "Checksum mismatch for {} (recorded {}, embedded {checksum})",
                            migration.key(),
                            existing.checksum
                        )
                        .into(),
                        context: Some("Migration was changed after it had been applied".into()),
                    });
                }
                report.skipped.push(step);
                continue;
            }

            self.apply(migration, checksum).await?;
            report.applied.push(step);
        }

        Ok(report)
    }

    async fn apply(&self, migration: &Migration, checksum: String) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{ slice: $slice, version: $version, checksum: $checksum, applied_at: time::now() }};
            COMMIT TRANSACTION;",
            migration.script
        );

        self.db
            .query(&query)
            .bind(("slice", migration.slice))
            .bind(("version", migration.version))
            .bind(("checksum", checksum))
            .await
            .context(format!("Executing migration {}", migration.key()))?
            .check()
            .map_err(surrealdb::Error::from)?;

        Ok(())
    }

    async fn applied(&self) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT slice, version, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing applied migrations")?;

        Ok(entries.into_iter().map(|entry| (format!("{}:{}", entry.slice, entry.version), entry)).collect())
    }
}
