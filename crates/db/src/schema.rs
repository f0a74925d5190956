use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create users table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            username VARCHAR(50) NOT NULL UNIQUE,
            email VARCHAR(100) NOT NULL UNIQUE,
            name VARCHAR(100) NOT NULL,
            password_hash VARCHAR(255) NOT NULL,
            is_admin BOOLEAN NOT NULL DEFAULT FALSE,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create sessions table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            token VARCHAR(64) PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            expires_at TIMESTAMP WITH TIME ZONE NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create courts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courts (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(100) NOT NULL,
            sport_type VARCHAR(50) NOT NULL DEFAULT 'Outros',
            location VARCHAR(200) NULL,
            city VARCHAR(100) NULL,
            description TEXT NULL,
            hourly_price DOUBLE PRECISION NOT NULL DEFAULT 0.0,
            capacity INTEGER NOT NULL DEFAULT 10,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT non_negative_price CHECK (hourly_price >= 0),
            CONSTRAINT positive_capacity CHECK (capacity > 0)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create rooms table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS rooms (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(100) NOT NULL,
            sport VARCHAR(50) NOT NULL,
            date TIMESTAMP WITH TIME ZONE NOT NULL,
            duration_hours INTEGER NOT NULL DEFAULT 1,
            max_participants INTEGER NOT NULL,
            description TEXT NULL,
            city VARCHAR(100) NOT NULL DEFAULT 'Não informada',
            location VARCHAR(200) NULL,
            link_code VARCHAR(16) NOT NULL UNIQUE,
            is_private BOOLEAN NOT NULL DEFAULT FALSE,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            creator_id UUID NOT NULL REFERENCES users(id),
            court_id UUID NULL REFERENCES courts(id),
            price_per_person DOUBLE PRECISION NOT NULL DEFAULT 0.0,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_duration CHECK (duration_hours > 0),
            CONSTRAINT valid_capacity CHECK (max_participants >= 2)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create participants table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS participants (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            user_id UUID NOT NULL REFERENCES users(id),
            room_id UUID NOT NULL REFERENCES rooms(id) ON DELETE CASCADE,
            registered_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            checked_in BOOLEAN NOT NULL DEFAULT FALSE,
            payment_status VARCHAR(20) NOT NULL DEFAULT 'pending',
            payment_method VARCHAR(50) NULL,
            payment_date TIMESTAMP WITH TIME ZONE NULL,
            notes TEXT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_rooms_date ON rooms(date)",
        "CREATE INDEX IF NOT EXISTS idx_rooms_creator_id ON rooms(creator_id)",
        "CREATE INDEX IF NOT EXISTS idx_rooms_court_id ON rooms(court_id)",
        "CREATE INDEX IF NOT EXISTS idx_participants_room_id ON participants(room_id)",
        "CREATE INDEX IF NOT EXISTS idx_participants_user_id ON participants(user_id)",
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_participants_one_active_seat ON participants(room_id, user_id) WHERE is_active",
    ];
    for statement in indexes {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
