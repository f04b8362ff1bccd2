use super::{required, AppContext, FetchState, Route, ScreenError};
use crate::api::{LoginRequest, RegisterRequest};
use crate::http_api::HttpCallSource;
use crate::session::Session;
use crate::utils::is_valid_email;

pub const FILL_ALL_FIELDS: &str = "Please fill out all fields.";
pub const INVALID_EMAIL: &str = "Please enter a valid email address.";
const LOGIN_FAILED: &str = "Login failed. Please try again.";
const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";
const REGISTERED: &str = "Registered successfully!";

pub struct LoginScreen<CS> {
    ctx: AppContext<CS>,
    pub state: FetchState,
}

impl<CS: HttpCallSource> LoginScreen<CS> {
    pub fn new(ctx: AppContext<CS>) -> Self {
        Self {
            ctx,
            state: FetchState::Idle,
        }
    }

    pub fn register(&self) -> Route {
        Route::Register
    }

    /// Exchanges the credentials for a token and stores it next to the nickname that was
    /// typed in.
    pub async fn submit(
        &mut self,
        nickname: &str,
        email: &str,
        password: &str,
    ) -> Result<Route, ScreenError> {
        let nickname = required(nickname, FILL_ALL_FIELDS)?;
        let email = required(email, FILL_ALL_FIELDS)?;
        if password.is_empty() {
            return Err(ScreenError::validation(FILL_ALL_FIELDS));
        }

        let ctx = &self.ctx;
        self.state
            .track(async {
                let token = ctx
                    .client
                    .call(
                        None,
                        &LoginRequest {
                            email,
                            nickname,
                            password,
                        },
                    )
                    .await
                    .map_err(|e| ScreenError::from_api(e, LOGIN_FAILED))?;

                ctx.store.save_session(&Session::new(token, nickname))?;
                Ok::<_, ScreenError>(Route::ChatOverview)
            })
            .await
    }
}

pub struct Registration<'a> {
    pub name: &'a str,
    pub lastname: &'a str,
    pub nickname: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

pub struct RegisterScreen<CS> {
    ctx: AppContext<CS>,
    pub state: FetchState,
}

impl<CS: HttpCallSource> RegisterScreen<CS> {
    pub fn new(ctx: AppContext<CS>) -> Self {
        Self {
            ctx,
            state: FetchState::Idle,
        }
    }

    /// Creates the account. The user still has to log in afterwards; returns the server's
    /// confirmation and the login route.
    pub async fn submit(&mut self, form: &Registration<'_>) -> Result<(String, Route), ScreenError> {
        let name = required(form.name, FILL_ALL_FIELDS)?;
        let lastname = required(form.lastname, FILL_ALL_FIELDS)?;
        let nickname = required(form.nickname, FILL_ALL_FIELDS)?;
        let email = required(form.email, FILL_ALL_FIELDS)?;
        if form.password.is_empty() {
            return Err(ScreenError::validation(FILL_ALL_FIELDS));
        }
        if !is_valid_email(email) {
            return Err(ScreenError::validation(INVALID_EMAIL));
        }

        let client = &self.ctx.client;
        self.state
            .track(async {
                let confirmation = client
                    .acknowledge(
                        None,
                        &RegisterRequest {
                            name,
                            lastname,
                            nickname,
                            email,
                            password: form.password,
                        },
                        REGISTERED,
                    )
                    .await
                    .map_err(|e| ScreenError::from_api(e, REGISTRATION_FAILED))?;
                Ok::<_, ScreenError>((confirmation, Route::Login))
            })
            .await
    }
}
