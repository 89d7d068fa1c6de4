use crate::types::Context;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::{Credentials, Mechanism},
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::sync::Arc;

#[derive(Debug)]
pub enum Error {
    InvalidMessage,
    NotSent,
}

type Result<T> = std::result::Result<T, Error>;

pub enum Notification {
    VerificationCode {
        email: String,
        username: String,
        code: String,
    },
}

pub async fn send(ctx: Arc<Context>, notification: Notification) -> Result<()> {
    match notification {
        Notification::VerificationCode {
            email,
            username,
            code,
        } => {
            let message = Message::builder()
                .from(
                    format!("FoodCourt <{}>", ctx.mail.sender.clone())
                        .parse()
                        .map_err(|_| Error::InvalidMessage)?,
                )
                .to(format!("{} <{}>", username, email)
                    .parse()
                    .map_err(|_| Error::InvalidMessage)?)
                .subject("Your FoodCourt verification code")
                .header(ContentType::TEXT_PLAIN)
                .body(format!(
                    "Hi {},\n\nYour verification code is {}. It expires in 10 minutes.\n",
                    username, code
                ))
                .map_err(|err| {
                    tracing::error!("Failed to build verification email: {:?}", err);
                    Error::InvalidMessage
                })?;

            let transport: AsyncSmtpTransport<Tokio1Executor> =
                AsyncSmtpTransport::<Tokio1Executor>::relay(ctx.mail.host.as_str())
                    .map_err(|err| {
                        tracing::error!("Failed to build mail transport: {:?}", err);
                        Error::NotSent
                    })?
                    .authentication(vec![Mechanism::Plain])
                    .credentials(Credentials::new(
                        ctx.mail.user.clone(),
                        ctx.mail.password.clone(),
                    ))
                    .build();

            match transport.send(message).await {
                Ok(_) => Ok(()),
                Err(err) => {
                    tracing::error!("Failed to send email: {:?}", err);
                    Err(Error::NotSent)
                }
            }
        }
    }
}
