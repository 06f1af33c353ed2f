use crate::{
    api::{attendance, employee, records, summary},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-scope limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let api_limiter = build_limiter(config.rate_api_per_min);

    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(api_limiter) // rate limiting
            .service(
                web::scope("/attendance")
                    // /attendance/check-in
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    // /attendance/check-out
                    .service(
                        web::resource("/check-out").route(web::put().to(attendance::check_out)),
                    )
                    // /attendance/today
                    .service(web::resource("/today").route(web::get().to(attendance::today)))
                    // /attendance/summary
                    .service(web::resource("/summary").route(web::get().to(summary::summary)))
                    // /attendance/records
                    .service(web::resource("/records").route(web::get().to(records::list_records)))
                    // /attendance/records/{id}
                    .service(
                        web::resource("/records/{id}")
                            .route(web::get().to(records::get_record))
                            .route(web::delete().to(records::delete_record)),
                    )
                    // /attendance/records/{id}/restore
                    .service(
                        web::resource("/records/{id}/restore")
                            .route(web::post().to(records::restore_record)),
                    ),
            )
            .service(
                web::scope("/employees")
                    // /employees/{id}
                    .service(web::resource("/{id}").route(web::get().to(employee::get_employee))),
            ),
    );
}
