// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{FromRequest, Path, Request, State as AxumState},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{error, info};

use atrium_api::{
    AccountEngine, ApiError, BookingAdminView, BookingMemberView, ClaimCodeRequest, ClaimOutcome,
    CreateEventRequest, CredentialService, EventView, InviteOutcome, InviteRequest, LoginRequest,
    LoginSuccess, NewVillaBooking, ReferralEngine, ReferralView, ReservationEngine, RewardView,
    UpdateReferralStatusRequest, UpdateRewardStatusRequest, UserView, VillaBookingUpdate,
};
use atrium_audit::{AdminActionRecord, AuditRecorder, LoginAttemptRecord};
use atrium_domain::VillaBookingRecord;
use atrium_store::MemoryStore;

mod session;

use session::{AdminMember, Member, NdaMember};

/// Atrium Server - HTTP server for the Atrium membership backend
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Secret used to sign and verify session tokens
    #[arg(long, env = "ATRIUM_JWT_SECRET")]
    jwt_secret: String,

    /// Session token lifetime in hours
    #[arg(long, default_value_t = 24)]
    token_ttl_hours: u32,
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The shared document store.
    pub store: Arc<MemoryStore>,
    /// Credential service for tokens and password hashing.
    pub credentials: Arc<CredentialService>,
    /// Account operations.
    pub accounts: AccountEngine,
    /// Referral and reward operations.
    pub referrals: ReferralEngine,
    /// Event and villa-booking operations.
    pub reservations: ReservationEngine,
    /// Fire-and-forget audit trail.
    pub audit: AuditRecorder,
}

impl AppState {
    /// Wires every engine over one fresh store.
    fn new(credentials: CredentialService) -> Self {
        let store: Arc<MemoryStore> = Arc::new(MemoryStore::new());
        let audit: AuditRecorder = AuditRecorder::new(Arc::clone(&store));
        Self {
            accounts: AccountEngine::new(Arc::clone(&store), audit.clone()),
            referrals: ReferralEngine::new(Arc::clone(&store)),
            reservations: ReservationEngine::new(Arc::clone(&store)),
            credentials: Arc::new(credentials),
            audit,
            store,
        }
    }
}

/// API response for the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HealthResponse {
    /// Service status.
    status: String,
    /// Service name.
    service: String,
}

/// API response for a successful access-code claim.
#[derive(Debug, Clone, Serialize)]
struct ClaimCodeResponse {
    /// Success indicator.
    success: bool,
    /// A success message.
    message: String,
    /// The activated user's id.
    user_id: String,
    /// A session token for the activated account.
    token: String,
}

/// API response for a successful login.
#[derive(Debug, Clone, Serialize)]
struct LoginResponse {
    /// Success indicator.
    success: bool,
    /// A session token.
    token: String,
    /// The authenticated user's profile, credentials stripped.
    user: UserView,
}

/// API response for a created invite.
#[derive(Debug, Clone, Serialize)]
struct InviteResponse {
    /// Success indicator.
    success: bool,
    /// The created referral's id.
    referral_id: String,
    /// The single-use access code. Shown once; not retrievable later.
    access_code: String,
}

/// API response for write operations without a dedicated body.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WriteResponse {
    /// Success indicator.
    success: bool,
    /// Optional message.
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// API response for a status transition.
#[derive(Debug, Clone, Serialize)]
struct StatusResponse {
    /// Success indicator.
    success: bool,
    /// The status after the transition.
    status: String,
}

/// API response for the NDA status endpoint.
#[derive(Debug, Clone, Serialize)]
struct NdaStatusResponse {
    /// Whether the member has accepted the NDA.
    is_nda_accepted: bool,
    /// When the NDA was accepted.
    #[serde(with = "time::serde::rfc3339::option")]
    nda_accepted_at: Option<OffsetDateTime>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error indicator.
    pub error: bool,
    /// Error message.
    pub message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden { .. } => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Contention { .. } | ApiError::Internal { .. } => {
                error!(error = %err, "internal error reached the transport layer");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// JSON request body extractor.
///
/// A malformed or incomplete body is a validation failure, so the
/// extractor rejection is reported through the same 400 error shape as
/// engine validation instead of axum's default 422.
struct JsonBody<T>(T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned + Send,
{
    type Rejection = HttpError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(HttpError {
                status: StatusCode::BAD_REQUEST,
                message: rejection.body_text(),
            }),
        }
    }
}

/// Handler for GET `/`.
async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
        service: String::from("atrium-server"),
    })
}

/// Handler for POST `/api/auth/claim-code`.
///
/// Redeems a single-use access code, sets the password, and returns a
/// session token for the activated account.
async fn handle_claim_code(
    AxumState(state): AxumState<AppState>,
    JsonBody(req): JsonBody<ClaimCodeRequest>,
) -> Result<Json<ClaimCodeResponse>, HttpError> {
    let outcome: ClaimOutcome =
        state
            .referrals
            .claim_code(&state.credentials, &req.access_code, &req.password)?;

    Ok(Json(ClaimCodeResponse {
        success: true,
        message: String::from("Account activated successfully."),
        user_id: outcome.user_id,
        token: outcome.token,
    }))
}

/// Handler for POST `/api/auth/login`.
async fn handle_login(
    AxumState(state): AxumState<AppState>,
    headers: HeaderMap,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let user_agent: Option<String> = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let success: LoginSuccess =
        state
            .accounts
            .login(&state.credentials, &req.email, &req.password, user_agent)?;

    Ok(Json(LoginResponse {
        success: true,
        token: success.token,
        user: UserView {
            id: success.user_id,
            user: success.user,
        },
    }))
}

/// Handler for POST `/api/members/acknowledge-nda`.
async fn handle_acknowledge_nda(
    AxumState(state): AxumState<AppState>,
    Member(principal): Member,
) -> Result<Json<WriteResponse>, HttpError> {
    let already: bool = state.accounts.acknowledge_nda(&principal.id)?;
    let message: String = if already {
        String::from("NDA was already accepted.")
    } else {
        String::from("NDA accepted.")
    };

    Ok(Json(WriteResponse {
        success: true,
        message: Some(message),
    }))
}

/// Handler for GET `/api/members/nda-status`.
async fn handle_nda_status(
    AxumState(state): AxumState<AppState>,
    Member(principal): Member,
) -> Result<Json<NdaStatusResponse>, HttpError> {
    let (is_nda_accepted, nda_accepted_at) = state.accounts.nda_status(&principal.id)?;
    Ok(Json(NdaStatusResponse {
        is_nda_accepted,
        nda_accepted_at,
    }))
}

/// Handler for POST `/api/referrals/invite`.
async fn handle_invite(
    AxumState(state): AxumState<AppState>,
    Member(principal): Member,
    JsonBody(req): JsonBody<InviteRequest>,
) -> Result<Json<InviteResponse>, HttpError> {
    let outcome: InviteOutcome =
        state
            .referrals
            .invite(&principal.id, &req.referred_name, &req.referred_email)?;

    Ok(Json(InviteResponse {
        success: true,
        referral_id: outcome.referral_id,
        access_code: outcome.access_code,
    }))
}

/// Handler for GET `/api/referrals/my-referrals`.
async fn handle_my_referrals(
    AxumState(state): AxumState<AppState>,
    Member(principal): Member,
) -> Result<Json<Vec<ReferralView>>, HttpError> {
    let referrals: Vec<ReferralView> = state
        .referrals
        .my_referrals(&principal.id)?
        .into_iter()
        .map(|(id, referral)| ReferralView { id, referral })
        .collect();
    Ok(Json(referrals))
}

/// Handler for GET `/api/referrals/admin`.
async fn handle_all_referrals(
    AxumState(state): AxumState<AppState>,
    AdminMember(_): AdminMember,
) -> Result<Json<Vec<ReferralView>>, HttpError> {
    let referrals: Vec<ReferralView> = state
        .referrals
        .all_referrals()?
        .into_iter()
        .map(|(id, referral)| ReferralView { id, referral })
        .collect();
    Ok(Json(referrals))
}

/// Handler for PUT `/api/referrals/admin/{id}/status`.
///
/// Moves a referral through the vetting pipeline. The Approved
/// transition issues the referrer's reward, exactly once.
async fn handle_update_referral_status(
    AxumState(state): AxumState<AppState>,
    AdminMember(admin): AdminMember,
    Path(referral_id): Path<String>,
    JsonBody(req): JsonBody<UpdateReferralStatusRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    let status = state.referrals.update_referral_status(
        &admin.id,
        &referral_id,
        &req.status,
        req.reward_type,
    )?;
    state.audit.record_admin_action(
        &admin.id,
        "update_referral_status",
        format!("referral {referral_id} -> {}", status.as_str()),
    );

    Ok(Json(StatusResponse {
        success: true,
        status: status.as_str().to_string(),
    }))
}

/// Handler for GET `/api/referrals/admin/rewards`.
async fn handle_all_rewards(
    AxumState(state): AxumState<AppState>,
    AdminMember(_): AdminMember,
) -> Result<Json<Vec<RewardView>>, HttpError> {
    let rewards: Vec<RewardView> = state
        .referrals
        .all_rewards()?
        .into_iter()
        .map(|(id, reward)| RewardView { id, reward })
        .collect();
    Ok(Json(rewards))
}

/// Handler for PUT `/api/referrals/admin/rewards/{id}/status`.
async fn handle_update_reward_status(
    AxumState(state): AxumState<AppState>,
    AdminMember(admin): AdminMember,
    Path(reward_id): Path<String>,
    JsonBody(req): JsonBody<UpdateRewardStatusRequest>,
) -> Result<Json<StatusResponse>, HttpError> {
    let status = state
        .referrals
        .update_reward_status(&admin.id, &reward_id, &req.status)?;
    state.audit.record_admin_action(
        &admin.id,
        "update_reward_status",
        format!("reward {reward_id} -> {}", status.as_str()),
    );

    Ok(Json(StatusResponse {
        success: true,
        status: status.as_str().to_string(),
    }))
}

/// Handler for GET `/api/events`.
async fn handle_list_events(
    AxumState(state): AxumState<AppState>,
    NdaMember(_): NdaMember,
) -> Result<Json<Vec<EventView>>, HttpError> {
    let events: Vec<EventView> = state
        .reservations
        .upcoming_events(OffsetDateTime::now_utc())?
        .into_iter()
        .map(|(id, event)| EventView { id, event })
        .collect();
    Ok(Json(events))
}

/// Handler for POST `/api/events`.
async fn handle_create_event(
    AxumState(state): AxumState<AppState>,
    AdminMember(admin): AdminMember,
    JsonBody(req): JsonBody<CreateEventRequest>,
) -> Result<Json<WriteResponse>, HttpError> {
    let event_id: String = state.reservations.create_event(req)?;
    state
        .audit
        .record_admin_action(&admin.id, "create_event", format!("event {event_id}"));

    Ok(Json(WriteResponse {
        success: true,
        message: Some(String::from("Event created.")),
    }))
}

/// Handler for POST `/api/events/{id}/rsvp`.
async fn handle_rsvp(
    AxumState(state): AxumState<AppState>,
    NdaMember(principal): NdaMember,
    Path(event_id): Path<String>,
) -> Result<Json<WriteResponse>, HttpError> {
    state.reservations.rsvp(&event_id, &principal.id)?;
    Ok(Json(WriteResponse {
        success: true,
        message: Some(String::from("RSVP recorded.")),
    }))
}

/// Handler for DELETE `/api/events/{id}/rsvp`.
async fn handle_cancel_rsvp(
    AxumState(state): AxumState<AppState>,
    NdaMember(principal): NdaMember,
    Path(event_id): Path<String>,
) -> Result<Json<WriteResponse>, HttpError> {
    state.reservations.cancel_rsvp(&event_id, &principal.id)?;
    Ok(Json(WriteResponse {
        success: true,
        message: Some(String::from("RSVP canceled.")),
    }))
}

/// Handler for GET `/api/villas/my-bookings`.
///
/// Member view; hides pricing and property contact details.
async fn handle_my_bookings(
    AxumState(state): AxumState<AppState>,
    Member(principal): Member,
) -> Result<Json<Vec<BookingMemberView>>, HttpError> {
    let bookings: Vec<BookingMemberView> = state
        .reservations
        .my_bookings(&principal.id)?
        .into_iter()
        .map(|(id, booking)| BookingMemberView::from_record(id, booking))
        .collect();
    Ok(Json(bookings))
}

/// Handler for GET `/api/villas/admin`.
async fn handle_all_bookings(
    AxumState(state): AxumState<AppState>,
    AdminMember(_): AdminMember,
) -> Result<Json<Vec<BookingAdminView>>, HttpError> {
    let bookings: Vec<BookingAdminView> = state
        .reservations
        .all_bookings()?
        .into_iter()
        .map(|(id, booking)| BookingAdminView { id, booking })
        .collect();
    Ok(Json(bookings))
}

/// Handler for POST `/api/villas/admin`.
async fn handle_create_booking(
    AxumState(state): AxumState<AppState>,
    AdminMember(admin): AdminMember,
    JsonBody(req): JsonBody<NewVillaBooking>,
) -> Result<Json<WriteResponse>, HttpError> {
    let booking_id: String = state.reservations.create_booking(&admin.id, req)?;
    state
        .audit
        .record_admin_action(&admin.id, "create_booking", format!("booking {booking_id}"));

    Ok(Json(WriteResponse {
        success: true,
        message: Some(String::from("Booking created.")),
    }))
}

/// Handler for GET `/api/villas/admin/{id}`.
async fn handle_get_booking(
    AxumState(state): AxumState<AppState>,
    AdminMember(_): AdminMember,
    Path(booking_id): Path<String>,
) -> Result<Json<BookingAdminView>, HttpError> {
    let booking: VillaBookingRecord = state.reservations.booking(&booking_id)?;
    Ok(Json(BookingAdminView {
        id: booking_id,
        booking,
    }))
}

/// Handler for PUT `/api/villas/admin/{id}`.
async fn handle_update_booking(
    AxumState(state): AxumState<AppState>,
    AdminMember(admin): AdminMember,
    Path(booking_id): Path<String>,
    JsonBody(req): JsonBody<VillaBookingUpdate>,
) -> Result<Json<WriteResponse>, HttpError> {
    state.reservations.update_booking(&booking_id, req)?;
    state
        .audit
        .record_admin_action(&admin.id, "update_booking", format!("booking {booking_id}"));

    Ok(Json(WriteResponse {
        success: true,
        message: Some(String::from("Booking updated.")),
    }))
}

/// Handler for DELETE `/api/villas/admin/{id}`.
async fn handle_delete_booking(
    AxumState(state): AxumState<AppState>,
    AdminMember(admin): AdminMember,
    Path(booking_id): Path<String>,
) -> Result<Json<WriteResponse>, HttpError> {
    state.reservations.delete_booking(&booking_id)?;
    state
        .audit
        .record_admin_action(&admin.id, "delete_booking", format!("booking {booking_id}"));

    Ok(Json(WriteResponse {
        success: true,
        message: Some(String::from("Booking deleted.")),
    }))
}

/// Handler for GET `/api/security/logins`.
async fn handle_login_logs(
    AxumState(state): AxumState<AppState>,
    AdminMember(_): AdminMember,
) -> Result<Json<Vec<LoginAttemptRecord>>, HttpError> {
    let attempts: Vec<LoginAttemptRecord> = state.audit.login_attempts().map_err(ApiError::from)?;
    Ok(Json(attempts))
}

/// Handler for GET `/api/security/admin-actions`.
async fn handle_admin_actions(
    AxumState(state): AxumState<AppState>,
    AdminMember(_): AdminMember,
) -> Result<Json<Vec<AdminActionRecord>>, HttpError> {
    let actions: Vec<AdminActionRecord> = state.audit.admin_actions().map_err(ApiError::from)?;
    Ok(Json(actions))
}

/// Handler for DELETE `/api/security/users/{id}`.
async fn handle_soft_delete_user(
    AxumState(state): AxumState<AppState>,
    AdminMember(admin): AdminMember,
    Path(user_id): Path<String>,
) -> Result<Json<WriteResponse>, HttpError> {
    state.accounts.soft_delete_user(&admin.id, &user_id)?;
    Ok(Json(WriteResponse {
        success: true,
        message: Some(String::from("User deactivated.")),
    }))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_health))
        .route("/api/auth/claim-code", post(handle_claim_code))
        .route("/api/auth/login", post(handle_login))
        .route("/api/members/acknowledge-nda", post(handle_acknowledge_nda))
        .route("/api/members/nda-status", get(handle_nda_status))
        .route("/api/referrals/invite", post(handle_invite))
        .route("/api/referrals/my-referrals", get(handle_my_referrals))
        .route("/api/referrals/admin", get(handle_all_referrals))
        .route(
            "/api/referrals/admin/{id}/status",
            put(handle_update_referral_status),
        )
        .route("/api/referrals/admin/rewards", get(handle_all_rewards))
        .route(
            "/api/referrals/admin/rewards/{id}/status",
            put(handle_update_reward_status),
        )
        .route("/api/events", get(handle_list_events))
        .route("/api/events", post(handle_create_event))
        .route("/api/events/{id}/rsvp", post(handle_rsvp))
        .route("/api/events/{id}/rsvp", delete(handle_cancel_rsvp))
        .route("/api/villas/my-bookings", get(handle_my_bookings))
        .route("/api/villas/admin", get(handle_all_bookings))
        .route("/api/villas/admin", post(handle_create_booking))
        .route("/api/villas/admin/{id}", get(handle_get_booking))
        .route("/api/villas/admin/{id}", put(handle_update_booking))
        .route("/api/villas/admin/{id}", delete(handle_delete_booking))
        .route("/api/security/logins", get(handle_login_logs))
        .route("/api/security/admin-actions", get(handle_admin_actions))
        .route("/api/security/users/{id}", delete(handle_soft_delete_user))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Atrium Server");

    let credentials: CredentialService = CredentialService::new(
        &args.jwt_secret,
        time::Duration::hours(i64::from(args.token_ttl_hours)),
    );
    let app_state: AppState = AppState::new(credentials);

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
