pub mod forgot_password;
pub mod login_user;
pub mod register_user;
pub mod reset_password;
pub mod verify_email;

pub use forgot_password::{ForgotPasswordCommand, ForgotPasswordUseCase};
pub use login_user::{LoginUserCommand, LoginUserResponse, LoginUserUseCase};
pub use register_user::{RegisterUserCommand, RegisterUserResponse, RegisterUserUseCase};
pub use reset_password::{ResetPasswordCommand, ResetPasswordUseCase};
pub use verify_email::{VerifyEmailCommand, VerifyEmailResponse, VerifyEmailUseCase};
