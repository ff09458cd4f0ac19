//! Account session commands.

use secrecy::SecretString;

use elitecart_client::Storefront;
use elitecart_client::services::SignupForm;
use elitecart_core::UserProfile;

use super::{CommandError, OrExplain};

/// Create an account and sign in.
#[allow(clippy::print_stdout)]
pub async fn signup(
    storefront: &Storefront,
    name: &str,
    email: &str,
    password: &SecretString,
    confirm_password: &SecretString,
) -> Result<(), CommandError> {
    let profile = storefront
        .auth()
        .signup(&SignupForm {
            name,
            email,
            password,
            confirm_password,
        })
        .await
        .or_explain("Signup failed. Please try again.")?;
    println!("Welcome, {}!", display_name(&profile));
    Ok(())
}

/// Sign in.
#[allow(clippy::print_stdout)]
pub async fn login(
    storefront: &Storefront,
    email: &str,
    password: &SecretString,
) -> Result<(), CommandError> {
    let profile = storefront
        .auth()
        .login(email, password)
        .await
        .or_explain("Login failed. Please try again.")?;
    println!("Logged in as {}", display_name(&profile));
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn logout(storefront: &Storefront) {
    storefront.auth().logout();
    println!("Logged out");
}

#[allow(clippy::print_stdout)]
pub fn whoami(storefront: &Storefront) {
    let session = storefront.session().snapshot();
    match (session.authenticated, session.user) {
        (true, Some(user)) => println!(
            "{} <{}> (user #{})",
            display_name(&user),
            user.email,
            user.user_id
        ),
        (true, None) => println!("Logged in"),
        (false, _) => println!("Not logged in"),
    }
}

fn display_name(profile: &UserProfile) -> &str {
    if profile.name.is_empty() {
        profile.email.as_str()
    } else {
        &profile.name
    }
}
