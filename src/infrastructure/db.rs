use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, DbErr, Statement,
};

/// Connect with the default pool size
pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    init_db_with_pool(database_url, 10).await
}

pub async fn init_db_with_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.sqlx_logging(false);

    // Every pooled connection to `sqlite::memory:` is its own database
    if database_url.contains(":memory:") {
        opt.max_connections(1).min_connections(1);
    } else {
        opt.max_connections(max_connections);
    }

    let db = Database::connect(opt).await?;

    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();

    let create_books = match backend {
        DbBackend::Sqlite => {
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                author TEXT NOT NULL,
                isbn TEXT,
                published_year INTEGER,
                genre TEXT,
                description TEXT,
                cover_image TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#
        }
        DbBackend::MySql => {
            r#"
            CREATE TABLE IF NOT EXISTS books (
                id INT AUTO_INCREMENT PRIMARY KEY,
                title VARCHAR(255) NOT NULL,
                author VARCHAR(255) NOT NULL,
                isbn VARCHAR(32),
                published_year INT,
                genre VARCHAR(100),
                description TEXT,
                cover_image VARCHAR(512),
                created_at VARCHAR(32) NOT NULL,
                updated_at VARCHAR(32) NOT NULL
            ) DEFAULT CHARSET = utf8mb4
            "#
        }
        other => {
            return Err(DbErr::Custom(format!(
                "Unsupported database backend: {:?}",
                other
            )));
        }
    };

    db.execute(Statement::from_string(backend, create_books.to_owned()))
        .await?;

    if backend == DbBackend::Sqlite {
        db.execute(Statement::from_string(
            backend,
            "CREATE INDEX IF NOT EXISTS idx_books_created_at ON books (created_at)".to_owned(),
        ))
        .await?;
    } else if let Err(e) = db
        .execute(Statement::from_string(
            backend,
            "CREATE INDEX idx_books_created_at ON books (created_at)".to_owned(),
        ))
        .await
    {
        // MySQL has no CREATE INDEX IF NOT EXISTS; fails on every restart
        tracing::debug!("Skipped created_at index: {}", e);
    }

    tracing::debug!("Database schema ready ({:?})", backend);

    Ok(())
}
