diesel::table! {
    users (id) {
        id -> Nullable<Integer>,
        username -> Text,
        email -> Text,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    drawings (id) {
        id -> Nullable<Integer>,
        game_type -> Text,
        number1 -> Integer,
        number2 -> Integer,
        number3 -> Integer,
        number4 -> Integer,
        number5 -> Integer,
        number6 -> Integer,
        bonus_number -> Nullable<Integer>,
        draw_time -> Timestamp,
        created_at -> Timestamp,
    }
}

diesel::table! {
    prize_categories (id) {
        id -> Nullable<Integer>,
        game_type -> Text,
        name -> Text,
        match_count -> Integer,
        include_bonus -> Bool,
        prize_amount -> BigInt,
        prize_percentage -> Double,
    }
}

diesel::table! {
    tickets (id) {
        id -> Nullable<Integer>,
        user_id -> Integer,
        game_type -> Text,
        number1 -> Integer,
        number2 -> Integer,
        number3 -> Integer,
        number4 -> Integer,
        number5 -> Integer,
        number6 -> Integer,
        created_at -> Timestamp,
        drawing_id -> Nullable<Integer>,
        prize_category_id -> Nullable<Integer>,
    }
}

diesel::table! {
    drawing_results (id) {
        id -> Nullable<Integer>,
        ticket_id -> Integer,
        drawing_id -> Integer,
        matched_numbers -> Text,
        matched_bonus -> Bool,
        prize_category_id -> Nullable<Integer>,
        prize_amount -> Nullable<BigInt>,
        created_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    users,
    drawings,
    prize_categories,
    tickets,
    drawing_results,
);

/// DDL applied to every new pooled connection. Idempotent.
pub const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS drawings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_type TEXT NOT NULL,
    number1 INTEGER NOT NULL,
    number2 INTEGER NOT NULL,
    number3 INTEGER NOT NULL,
    number4 INTEGER NOT NULL,
    number5 INTEGER NOT NULL,
    number6 INTEGER NOT NULL,
    bonus_number INTEGER,
    draw_time TIMESTAMP NOT NULL,
    created_at TIMESTAMP NOT NULL,
    UNIQUE (game_type, draw_time)
);

CREATE TABLE IF NOT EXISTS prize_categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    game_type TEXT NOT NULL,
    name TEXT NOT NULL,
    match_count INTEGER NOT NULL,
    include_bonus BOOLEAN NOT NULL,
    prize_amount BIGINT NOT NULL,
    prize_percentage DOUBLE NOT NULL,
    UNIQUE (game_type, match_count, include_bonus)
);

CREATE TABLE IF NOT EXISTS tickets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users (id),
    game_type TEXT NOT NULL,
    number1 INTEGER NOT NULL,
    number2 INTEGER NOT NULL,
    number3 INTEGER NOT NULL,
    number4 INTEGER NOT NULL,
    number5 INTEGER NOT NULL,
    number6 INTEGER NOT NULL,
    created_at TIMESTAMP NOT NULL,
    drawing_id INTEGER REFERENCES drawings (id),
    prize_category_id INTEGER REFERENCES prize_categories (id)
);

CREATE INDEX IF NOT EXISTS tickets_user_idx ON tickets (user_id);
CREATE INDEX IF NOT EXISTS tickets_drawing_idx ON tickets (drawing_id);

CREATE TABLE IF NOT EXISTS drawing_results (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ticket_id INTEGER NOT NULL REFERENCES tickets (id),
    drawing_id INTEGER NOT NULL REFERENCES drawings (id),
    matched_numbers TEXT NOT NULL,
    matched_bonus BOOLEAN NOT NULL,
    prize_category_id INTEGER REFERENCES prize_categories (id),
    prize_amount BIGINT,
    created_at TIMESTAMP NOT NULL,
    UNIQUE (ticket_id, drawing_id)
);
";
