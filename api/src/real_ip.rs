use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use std::net::{IpAddr, SocketAddr};

use crate::{App, error::AppError};

/// The originating client IP: the left-most non-private address in
/// X-Forwarded-For (we sit behind a trusted reverse proxy), falling back to
/// the connecting socket.
pub struct ClientIp(pub IpAddr);

impl FromRequestParts<App> for ClientIp {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &App) -> Result<Self, Self::Rejection> {
        let forwarded_ip = parts
            .headers
            .get_all("x-forwarded-for")
            .iter()
            .filter_map(|header| header.to_str().ok())
            .flat_map(|header| header.split(','))
            .filter_map(|ip| ip.trim().parse::<IpAddr>().ok())
            .find(|ip| match ip {
                IpAddr::V4(ip) => !ip.is_private() && !ip.is_loopback(),
                IpAddr::V6(_) => true,
            });

        Ok(ClientIp(match forwarded_ip {
            Some(ip) => ip,
            None => {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .ok_or("couldn't get connecting socket IP")?
                    .0
                    .ip()
            }
        }))
    }
}
