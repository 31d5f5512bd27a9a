//! Idempotent database creation
//!
//! Ensures the application database exists before the server ever
//! connects to it: check `pg_database`, create with the configured
//! owner only when absent. Postgres has no `CREATE DATABASE IF NOT
//! EXISTS`, so a concurrent bootstrap can win the race between the
//! check and the create; that shows up as SQLSTATE 42P04
//! (duplicate_database) and is folded into `AlreadyExists`.

use sqlx::PgPool;
use thiserror::Error;

use crate::models::PgIdent;

/// SQLSTATE: insufficient_privilege
const SQLSTATE_INSUFFICIENT_PRIVILEGE: &str = "42501";

/// SQLSTATE: undefined_object (missing owner role)
const SQLSTATE_UNDEFINED_OBJECT: &str = "42704";

/// SQLSTATE: duplicate_database (lost the create race)
const SQLSTATE_DUPLICATE_DATABASE: &str = "42P04";

/// Outcome of an `ensure_database` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureStatus {
    /// The database was absent and has been created
    Created,
    /// A database with that name already existed; nothing was done
    AlreadyExists,
}

/// Catalog error taxonomy for the bootstrap
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Executing principal may not create databases
    #[error("permission denied creating database '{name}'")]
    Permission {
        name: String,
        #[source]
        source: sqlx::Error,
    },

    /// The requested owner role does not exist in the catalog
    #[error("owner role '{role}' does not exist")]
    UnknownRole {
        role: String,
        #[source]
        source: sqlx::Error,
    },

    /// The catalog is unreachable
    #[error("could not reach catalog: {0}")]
    Connection(#[source] sqlx::Error),

    /// Anything else the catalog reported
    #[error("catalog error: {0}")]
    Catalog(#[source] sqlx::Error),
}

/// Ensure a database named `name` owned by `owner` exists.
///
/// Consults the catalog once and issues at most one mutation. The
/// owner role must already exist; this never creates it.
///
/// `admin` must be connected to a database that already exists
/// (typically `postgres`), since a session cannot create the database
/// it is connected to.
///
/// # Errors
///
/// * [`CatalogError::Permission`] - principal lacks CREATEDB
/// * [`CatalogError::UnknownRole`] - `owner` missing from the catalog
/// * [`CatalogError::Connection`] - catalog unreachable
/// * [`CatalogError::Catalog`] - any other server-reported failure
pub async fn ensure_database(
    admin: &PgPool,
    name: &PgIdent,
    owner: &PgIdent,
) -> Result<EnsureStatus, CatalogError> {
    let existing = sqlx::query("SELECT 1 FROM pg_database WHERE datname = $1")
        .bind(name.as_str())
        .fetch_optional(admin)
        .await
        .map_err(|e| classify(e, name, owner))?;

    if existing.is_some() {
        tracing::debug!(database = %name, "database already present, skipping create");
        return Ok(EnsureStatus::AlreadyExists);
    }

    // CREATE DATABASE cannot be prepared or run inside a transaction,
    // so it goes through the simple query protocol. Identifiers are
    // validated PgIdents; quoting is safe.
    let stmt = format!("CREATE DATABASE {} OWNER {}", name.quoted(), owner.quoted());
    match sqlx::raw_sql(&stmt).execute(admin).await {
        Ok(_) => {
            tracing::info!(database = %name, owner = %owner, "database created");
            Ok(EnsureStatus::Created)
        }
        Err(e) if lost_create_race(&e) => {
            // A concurrent bootstrap created it between check and create
            tracing::debug!(database = %name, "database created concurrently");
            Ok(EnsureStatus::AlreadyExists)
        }
        Err(e) => Err(classify(e, name, owner)),
    }
}

/// True when a create failed only because a concurrent bootstrap won
/// the race between the existence check and the create.
fn lost_create_race(e: &sqlx::Error) -> bool {
    sqlstate(e).as_deref() == Some(SQLSTATE_DUPLICATE_DATABASE)
}

/// Extract the SQLSTATE code from a sqlx error, if the server reported one.
fn sqlstate(e: &sqlx::Error) -> Option<String> {
    match e {
        sqlx::Error::Database(db) => db.code().map(|c| c.into_owned()),
        _ => None,
    }
}

/// Map a sqlx error into the bootstrap taxonomy.
fn classify(e: sqlx::Error, name: &PgIdent, owner: &PgIdent) -> CatalogError {
    if let Some(code) = sqlstate(&e) {
        return match code.as_str() {
            SQLSTATE_INSUFFICIENT_PRIVILEGE => CatalogError::Permission {
                name: name.as_str().to_owned(),
                source: e,
            },
            SQLSTATE_UNDEFINED_OBJECT => CatalogError::UnknownRole {
                role: owner.as_str().to_owned(),
                source: e,
            },
            _ => CatalogError::Catalog(e),
        };
    }

    match e {
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => CatalogError::Connection(e),
        other => CatalogError::Catalog(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> PgIdent {
        PgIdent::new(s).expect("valid test identifier")
    }

    /// Minimal server-reported error carrying a fixed SQLSTATE, for
    /// exercising the classification arms without a live catalog.
    #[derive(Debug)]
    struct StubDatabaseError {
        code: &'static str,
    }

    impl std::fmt::Display for StubDatabaseError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "SQLSTATE {}", self.code)
        }
    }

    impl std::error::Error for StubDatabaseError {}

    impl sqlx::error::DatabaseError for StubDatabaseError {
        fn message(&self) -> &str {
            "stub database error"
        }

        fn code(&self) -> Option<std::borrow::Cow<'_, str>> {
            Some(self.code.into())
        }

        fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> sqlx::error::ErrorKind {
            sqlx::error::ErrorKind::Other
        }
    }

    fn server_error(code: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(StubDatabaseError { code }))
    }

    #[test]
    fn insufficient_privilege_classifies_as_permission() {
        let err = classify(server_error("42501"), &ident("app"), &ident("app"));
        match err {
            CatalogError::Permission { name, .. } => assert_eq!(name, "app"),
            other => panic!("expected Permission, got {:?}", other),
        }
    }

    #[test]
    fn undefined_object_classifies_as_unknown_role() {
        let err = classify(server_error("42704"), &ident("app"), &ident("pharmacist"));
        match err {
            CatalogError::UnknownRole { role, .. } => assert_eq!(role, "pharmacist"),
            other => panic!("expected UnknownRole, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_database_folds_into_already_exists() {
        // The create statement losing the race reports 42P04
        assert!(lost_create_race(&server_error("42P04")));

        // Other server errors are not the race
        assert!(!lost_create_race(&server_error("42501")));
        assert!(!lost_create_race(&sqlx::Error::PoolTimedOut));
    }

    #[test]
    fn unrelated_sqlstate_classifies_as_catalog() {
        let err = classify(server_error("53300"), &ident("app"), &ident("app"));
        assert!(matches!(err, CatalogError::Catalog(_)));
    }

    #[test]
    fn connection_errors_classify_as_connection() {
        let e = sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            "refused",
        ));
        let err = classify(e, &ident("app"), &ident("app"));
        assert!(matches!(err, CatalogError::Connection(_)));

        let err = classify(sqlx::Error::PoolTimedOut, &ident("app"), &ident("app"));
        assert!(matches!(err, CatalogError::Connection(_)));
    }

    #[test]
    fn unclassified_errors_fall_back_to_catalog() {
        let err = classify(sqlx::Error::RowNotFound, &ident("app"), &ident("app"));
        assert!(matches!(err, CatalogError::Catalog(_)));
    }

    #[test]
    fn error_messages_name_the_subject() {
        let e = sqlx::Error::PoolClosed;
        let err = CatalogError::UnknownRole {
            role: "app".into(),
            source: e,
        };
        assert_eq!(err.to_string(), "owner role 'app' does not exist");
    }

    // Integration tests - run with an admin DATABASE_URL set:
    //   DATABASE_URL=postgres://postgres@localhost/postgres \
    //     cargo test -p pharmd-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn ensure_is_idempotent() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let admin = crate::db::pool::create_admin_pool(&url)
            .await
            .expect("admin pool");

        let name = ident("pharmd_ensure_test");
        let owner = ident("postgres");

        // Start clean
        let _ = sqlx::raw_sql("DROP DATABASE IF EXISTS \"pharmd_ensure_test\"")
            .execute(&admin)
            .await;

        let first = ensure_database(&admin, &name, &owner).await.expect("first");
        assert_eq!(first, EnsureStatus::Created);

        let second = ensure_database(&admin, &name, &owner)
            .await
            .expect("second");
        assert_eq!(second, EnsureStatus::AlreadyExists);

        let _ = sqlx::raw_sql("DROP DATABASE IF EXISTS \"pharmd_ensure_test\"")
            .execute(&admin)
            .await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn unknown_owner_role_fails_without_mutation() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let admin = crate::db::pool::create_admin_pool(&url)
            .await
            .expect("admin pool");

        let name = ident("pharmd_norole_test");
        let owner = ident("pharmd_role_that_does_not_exist");

        let err = ensure_database(&admin, &name, &owner)
            .await
            .expect_err("should fail");
        assert!(matches!(err, CatalogError::UnknownRole { .. }));

        // Catalog unchanged
        let row = sqlx::query("SELECT 1 FROM pg_database WHERE datname = $1")
            .bind(name.as_str())
            .fetch_optional(&admin)
            .await
            .expect("catalog query");
        assert!(row.is_none());
    }
}
