use axum::Json;
use shelf_types::Health;
use time::OffsetDateTime;

pub async fn health() -> Json<Health> {
    Json(Health {
        status: "healthy".into(),
        timestamp: OffsetDateTime::now_utc(),
        message: "Shelf API is running".into(),
    })
}
