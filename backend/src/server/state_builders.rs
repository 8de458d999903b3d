//! Builders wiring repositories and domain services into [`HttpState`].

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::{info, warn};

use roadguard::domain::ports::{
    NotificationRepository, OtpMailer, ServiceRequestRepository, UserRepository,
    WorkshopRepository,
};
use roadguard::domain::{
    AccountService, MechanicLocatorService, NotificationService, OtpService, OtpStore,
    RequestWorkflowService, WorkshopService,
};
use roadguard::inbound::http::state::HttpState;
use roadguard::outbound::mail::{LoggingOtpMailer, SmtpOtpMailer};
use roadguard::outbound::persistence::{
    DbPool, DieselNotificationRepository, DieselServiceRequestRepository, DieselUserRepository,
    DieselWorkshopRepository,
};
use roadguard::settings::AppSettings;

pub(crate) type Otp = OtpService<dyn OtpMailer>;

/// Repository adapters backing every service.
pub(crate) struct Repositories<U, Q, N, W> {
    pub users: Arc<U>,
    pub requests: Arc<Q>,
    pub notifications: Arc<N>,
    pub workshops: Arc<W>,
}

/// Wire services over `repos`.
///
/// The account service is returned alongside the state so start-up can
/// seed the administrator through it.
pub(crate) fn assemble<U, Q, N, W>(
    repos: Repositories<U, Q, N, W>,
    otp: Arc<Otp>,
    require_email_verification: bool,
) -> (HttpState, Arc<AccountService<U, Otp>>)
where
    U: UserRepository + 'static,
    Q: ServiceRequestRepository + 'static,
    N: NotificationRepository + 'static,
    W: WorkshopRepository + 'static,
{
    let Repositories {
        users,
        requests,
        notifications,
        workshops,
    } = repos;
    let accounts = Arc::new(
        AccountService::new(users.clone(), otp.clone())
            .with_email_verification(require_email_verification),
    );
    let state = HttpState {
        accounts: accounts.clone(),
        requests: Arc::new(RequestWorkflowService::new(
            users.clone(),
            requests.clone(),
            notifications.clone(),
        )),
        workshops: Arc::new(WorkshopService::new(workshops, requests)),
        notifications: Arc::new(NotificationService::new(notifications)),
        otp,
        mechanics: Arc::new(MechanicLocatorService::new(users)),
    };
    (state, accounts)
}

fn otp_mailer(settings: &AppSettings) -> std::io::Result<Arc<dyn OtpMailer>> {
    match settings.smtp() {
        Some(smtp) => {
            info!(host = %smtp.host, "delivering passcodes over SMTP");
            let mailer = SmtpOtpMailer::new(smtp)
                .map_err(std::io::Error::other)?
                .with_ttl(settings.otp_ttl());
            Ok(Arc::new(mailer))
        }
        None => {
            let reveal_codes = cfg!(debug_assertions);
            warn!(reveal_codes, "SMTP not configured; passcodes are not mailed");
            Ok(Arc::new(LoggingOtpMailer::new(reveal_codes)))
        }
    }
}

/// Build the production state over `pool` and seed the administrator.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the mailer cannot be configured or the
/// administrator cannot be seeded.
pub(crate) async fn build_http_state(
    pool: &DbPool,
    settings: &AppSettings,
) -> std::io::Result<HttpState> {
    let otp = Arc::new(
        OtpService::new(
            Arc::new(OtpStore::new()),
            otp_mailer(settings)?,
            Arc::new(DefaultClock),
        )
        .with_ttl(settings.otp_ttl()),
    );
    let repos = Repositories {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        requests: Arc::new(DieselServiceRequestRepository::new(pool.clone())),
        notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
        workshops: Arc::new(DieselWorkshopRepository::new(pool.clone())),
    };
    let (state, accounts) = assemble(repos, otp, settings.require_email_verification());

    let seed = settings.admin_seed().map_err(std::io::Error::other)?;
    let admin = accounts
        .seed_admin(&seed)
        .await
        .map_err(|err| std::io::Error::other(err.message().to_owned()))?;
    info!(admin_id = %admin.id, "administrator account ready");
    Ok(state)
}
