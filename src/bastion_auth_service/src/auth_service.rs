use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
        request,
    },
    middleware,
    routing::{get, post},
};
use bastion_axum::{
    middleware::{require_admin, require_auth},
    routes::{
        disable_two_factor, enable_two_factor, login, login_two_factor, logout, me, refresh,
        setup_two_factor, sweep_revocations,
    },
};
use bastion_core::{SupportsRevocationSweep, SupportsTwoFactorEnrollment};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    allowed_origins::AllowedOrigins,
    tracing::{make_span_with_request_id, on_request, on_response},
};

/// Main authentication service that provides all auth-related routes
pub struct AuthService {
    router: Router,
}

impl AuthService {
    /// Create a new AuthService around a shared authentication scheme
    ///
    /// # Arguments
    /// * `scheme` - The orchestrator every route delegates to
    ///
    /// # Note on Architecture
    /// Public routes take the scheme from router state. Protected routes sit behind the bearer
    /// middleware and receive the caller's `AuthContext` as a request extension; the sweep route
    /// additionally requires the admin role.
    pub fn new<A>(scheme: Arc<A>) -> Self
    where
        A: SupportsTwoFactorEnrollment + SupportsRevocationSweep,
    {
        let admin = Router::new()
            .route("/admin/revocations/sweep", post(sweep_revocations::<A>))
            .route_layer(middleware::from_fn(require_admin));

        let protected = Router::new()
            .route("/auth/logout", post(logout::<A>))
            .route("/auth/me", get(me))
            .route("/auth/2fa/setup", post(setup_two_factor::<A>))
            .route("/auth/2fa/enable", post(enable_two_factor::<A>))
            .route("/auth/2fa/disable", post(disable_two_factor::<A>))
            .merge(admin)
            .route_layer(middleware::from_fn_with_state(
                scheme.clone(),
                require_auth::<A>,
            ));

        let router = Router::new()
            .route("/auth/login", post(login::<A>))
            .route("/auth/login/2fa", post(login_two_factor::<A>))
            .route("/auth/refresh", post(refresh::<A>))
            .merge(protected)
            .with_state(scheme);

        Self { router }
    }

    fn with_trace_layer(mut self) -> Self {
        self.router = self.router.layer(
            TraceLayer::new_for_http()
                .make_span_with(make_span_with_request_id)
                .on_request(on_request)
                .on_response(on_response),
        );
        self
    }

    /// Convert the AuthService into a nested router that can be mounted on another router
    ///
    /// # Arguments
    /// * `allowed_origins` - Optional list of allowed CORS origins
    ///
    /// # Returns
    /// An Axum Router that can be nested into another application. Serve it with
    /// `into_make_service_with_connect_info::<SocketAddr>()`, the routes read the client address.
    pub fn as_nested_router(mut self, allowed_origins: Option<AllowedOrigins>) -> Router {
        if let Some(allowed_origins) = allowed_origins {
            let cors = CorsLayer::new()
                .allow_methods([Method::GET, Method::POST])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(AllowOrigin::predicate(
                    move |origin: &HeaderValue, _request_parts: &request::Parts| {
                        allowed_origins.contains(origin)
                    },
                ));

            self.router = self.router.layer(cors);
        }
        self.with_trace_layer().router
    }

    /// Run the auth service as a standalone server
    ///
    /// # Arguments
    /// * `listener` - TCP listener to bind the server to
    /// * `allowed_origins` - Optional list of allowed CORS origins
    ///
    /// # Returns
    /// Result indicating success or error
    pub async fn run_standalone(
        self,
        listener: TcpListener,
        allowed_origins: Option<AllowedOrigins>,
    ) -> Result<(), std::io::Error> {
        let router = self.as_nested_router(allowed_origins);

        tracing::info!("Auth service listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
    }
}
