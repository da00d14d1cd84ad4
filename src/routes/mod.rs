use actix_web::web;

use crate::handlers::{
    auth_handler, backend_health, db_read, explain, live, metrics, sync_handler,
};
use crate::middleware::auth::DashboardAuth;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(backend_health::health_check))
        .route("/explain", web::get().to(explain::explain));

    // Dashboard session endpoints. Login is open; verification requires a
    // valid token.
    cfg.service(
        web::scope("/api/auth")
            .route("/login", web::post().to(auth_handler::dashboard_login))
            .service(
                web::resource("/verify")
                    .wrap(DashboardAuth)
                    .route(web::get().to(auth_handler::verify_token)),
            ),
    );

    // Database reads. The range variant is dashboard-only; registration
    // order keeps it ahead of the single-day route.
    cfg.service(
        web::scope("/api/db")
            .service(
                web::resource("/{data_type}/range")
                    .wrap(DashboardAuth)
                    .route(web::get().to(db_read::get_range)),
            )
            .route("/{data_type}", web::get().to(db_read::get_daily)),
    );

    // Wearable endpoints authenticate per request through the
    // X-Email/X-Password extractor.
    cfg.service(
        web::scope("/api")
            .service(
                web::resource("/live")
                    .wrap(DashboardAuth)
                    .route(web::get().to(live::live_data)),
            )
            .route("/steps", web::get().to(metrics::steps))
            .route("/heartrate", web::get().to(metrics::heartrate))
            .route("/sleep", web::get().to(metrics::sleep))
            .route("/stress", web::get().to(metrics::stress))
            .route("/bodybattery", web::get().to(metrics::bodybattery))
            .route("/activities", web::get().to(metrics::activities))
            .route("/healthmetrics", web::get().to(metrics::healthmetrics))
            .route("/all", web::get().to(metrics::all_data))
            .route("/sync/{date}", web::post().to(sync_handler::sync_date)),
    );
}
