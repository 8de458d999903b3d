//! Diesel table definitions mirroring `backend/migrations`.
//!
//! Keep in step with the migrations; `diesel print-schema` against a
//! migrated database regenerates them.

diesel::table! {
    /// Registered accounts of every role.
    users (id) {
        id -> Int8,
        name -> Varchar,
        /// Lowercased; unique via `users_email_key`.
        email -> Varchar,
        /// Hex SHA-256 of the password.
        password_digest -> Varchar,
        /// One of `user`, `mechanic`, `admin`.
        role -> Varchar,
        /// Unique via `users_phone_key` when present.
        phone -> Nullable<Varchar>,
        verified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Roadside assistance requests.
    service_requests (id) {
        id -> Int8,
        user_id -> Int8,
        title -> Varchar,
        description -> Text,
        vehicle -> Nullable<Varchar>,
        service_type -> Nullable<Varchar>,
        lat -> Float8,
        lng -> Float8,
        status -> Varchar,
        /// Set exactly when the status is pending, accepted, enroute or completed.
        assigned_mechanic_id -> Nullable<Int8>,
        mechanic_response -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// In-app notifications addressed to a user, or broadcast to a role.
    notifications (id) {
        id -> Int8,
        role -> Nullable<Varchar>,
        user_id -> Nullable<Int8>,
        message -> Text,
        created_at -> Timestamptz,
        is_read -> Bool,
    }
}

diesel::table! {
    workshops (id) {
        id -> Int8,
        owner_id -> Nullable<Int8>,
        name -> Varchar,
        description -> Text,
        lat -> Float8,
        lng -> Float8,
        status -> Varchar,
        /// Mean review rating, recomputed on each review.
        rating -> Float8,
    }
}

diesel::table! {
    workshop_reviews (id) {
        id -> Int8,
        user_id -> Int8,
        workshop_id -> Int8,
        /// 1 to 5 inclusive.
        rating -> Int2,
        comment -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(service_requests -> users (user_id));
diesel::joinable!(workshop_reviews -> workshops (workshop_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    service_requests,
    notifications,
    workshops,
    workshop_reviews,
);
