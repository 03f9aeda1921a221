use anyhow::{Context, Result, ensure};

use crate::{
    app::AppState,
    domain::{Email, Password, ShortCode, TargetUrl},
    services::UrlRecord,
};

const DEMO_USERS: [(&str, &str); 2] = [
    ("user@example.com", "purple-monkey-dinosaur"),
    ("user2@example.com", "dishwasher-funk"),
];

/// (short code, target, index into `DEMO_USERS`)
const DEMO_URLS: [(&str, &str, usize); 3] = [
    ("b2xVn2", "http://www.lighthouselabs.ca", 0),
    ("9sm5xK", "http://www.google.com", 1),
    ("abc123", "http://www.example.com", 0),
];

/// Load the two demo accounts and their three URLs
pub fn seed_demo_data(state: &AppState) -> Result<()> {
    let mut owners = Vec::with_capacity(DEMO_USERS.len());

    for (email, password) in DEMO_USERS {
        let email = Email::parse(email).with_context(|| format!("demo email {email}"))?;
        let password = Password::parse(password).context("demo password")?;
        let id = state
            .credentials
            .register(email, &password)
            .context("registering demo user")?;
        owners.push(id);
    }

    for (code, target, owner) in DEMO_URLS {
        let owner_id = owners
            .get(owner)
            .cloned()
            .with_context(|| format!("no demo user #{owner}"))?;
        let record = UrlRecord {
            target_url: TargetUrl::parse(target).with_context(|| format!("demo url {target}"))?,
            owner_id,
        };
        let code = ShortCode::parse(code).with_context(|| format!("demo code {code}"))?;

        ensure!(
            state.registry.seed(code.clone(), record),
            "short code {code} is already taken"
        );
    }

    Ok(())
}
