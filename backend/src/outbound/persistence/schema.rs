//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. When migrations change the schema, regenerate with
//! `diesel print-schema` or update by hand.

diesel::table! {
    /// User accounts.
    ///
    /// `username` and `email` carry unique indexes; the password is stored
    /// only as an Argon2 PHC string.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login handle (3..=32 chars).
        username -> Varchar,
        /// Unique contact address.
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Varchar,
        /// Marketplace role: `client` or `freelancer`.
        role -> Varchar,
        /// Optional profile text.
        bio -> Nullable<Text>,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Job postings.
    jobs (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning client (FK to `users.id`).
        client_id -> Uuid,
        /// Trimmed title (max 200 chars).
        title -> Varchar,
        /// Trimmed description.
        description -> Text,
        /// Closed category value.
        category -> Varchar,
        /// Optional budget, NUMERIC(10,2).
        budget -> Nullable<Numeric>,
        /// True for fixed-price work, false for hourly.
        is_fixed_price -> Bool,
        /// Closed experience-level value.
        experience_level -> Varchar,
        /// Optional submission deadline.
        deadline -> Nullable<Timestamptz>,
        /// Visibility gate for public listing and detail.
        is_active -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Applications by freelancers to jobs.
    ///
    /// A unique index on `(job_id, freelancer_id)` enforces one application
    /// per freelancer per job; the insert path relies on it.
    job_applications (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Job applied to (FK to `jobs.id`).
        job_id -> Uuid,
        /// Applying freelancer (FK to `users.id`).
        freelancer_id -> Uuid,
        /// Trimmed cover letter.
        cover_letter -> Text,
        /// Optional bid, NUMERIC(10,2), strictly positive.
        bid_amount -> Nullable<Numeric>,
        /// Lifecycle state: `pending`, `accepted`, or `rejected`.
        status -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(jobs -> users (client_id));
diesel::joinable!(job_applications -> jobs (job_id));

diesel::allow_tables_to_appear_in_same_query!(users, jobs, job_applications);
