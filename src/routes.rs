use crate::{
    api::{employees, salaries},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::web;
use anyhow::{Result, anyhow};
use std::sync::Arc;

pub type RateLimiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per peer-IP limiter, `None` when `requests_per_min` is 0.
pub fn build_limiter(requests_per_min: u32) -> Result<Option<RateLimiter>> {
    if requests_per_min == 0 {
        return Ok(None);
    }

    let per_ms = (60_000 / requests_per_min as u64).max(1);
    let cfg = GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("invalid rate limit of {requests_per_min} requests per minute"))?;

    Ok(Some(Arc::new(Governor::new(&cfg))))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: Option<RateLimiter>) {
    let scope = web::scope(&config.api_prefix)
        .service(
            web::resource("/increase-salaries").route(web::put().to(salaries::increase_salaries)),
        )
        .service(
            web::resource("/increase-salaries-v2")
                .route(web::put().to(salaries::increase_salaries_v2)),
        )
        .service(
            web::resource("/increase-salaries-sql")
                .route(web::put().to(salaries::increase_salaries_sql)),
        )
        .service(
            web::resource("/increase-salaries-sql-dapper")
                .route(web::put().to(salaries::increase_salaries_sql_mapper)),
        )
        .service(
            web::resource("/delete-employees")
                .route(web::delete().to(employees::delete_employees)),
        );

    match limiter {
        Some(limiter) => cfg.service(scope.wrap(limiter)),
        None => cfg.service(scope),
    };
}
