use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn api_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(participant_routes())
        .merge(class_routes())
        .merge(enrollment_routes())
}

fn participant_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::participant::list_participants,
            handlers::participant::create_participant
        ))
        .routes(routes!(
            handlers::participant::get_participant,
            handlers::participant::update_participant,
            handlers::participant::delete_participant
        ))
}

fn class_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::class::list_classes,
            handlers::class::create_class
        ))
        .routes(routes!(
            handlers::class::get_class,
            handlers::class::update_class,
            handlers::class::delete_class
        ))
}

fn enrollment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::enrollment::create_enrollment))
        .routes(routes!(handlers::enrollment::delete_enrollment))
        .routes(routes!(handlers::enrollment::list_participant_enrollments))
        .routes(routes!(handlers::enrollment::list_class_enrollments))
}
