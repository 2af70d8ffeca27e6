//! In-process demonstration of the full SRP-6a flow.
//!
//! Registers a user, then runs two independent logins through the handshake
//! drivers to show that each attempt derives a fresh session key. Only
//! public values are printed.

use sha2::Sha256;
use srp6a_core::message::CredentialRecord;
use srp6a_crypto::{client, ClientHandshake, ServerHandshake, G_3072};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    let username = "linus@folkdatorn.se";
    let password = "$uper$ecure";

    // Registration: the server stores (username, salt, verifier) and never
    // sees the password.
    let salt = client::generate_salt();
    let private_key = client::derive_private_key::<Sha256>(&G_3072, &salt, username, password)?;
    let verifier = client::derive_verifier(&G_3072, &private_key)?;
    let record = CredentialRecord {
        username: username.to_string(),
        salt,
        verifier,
    };
    println!("registered {} (salt {})", record.username, record.salt);

    let first = login(&record, username, password)?;
    let second = login(&record, username, password)?;

    println!("login 1 key fingerprint: {}...", &first[..16]);
    println!("login 2 key fingerprint: {}...", &second[..16]);
    assert_ne!(first, second, "each attempt must derive a fresh key");
    println!("both logins mutually verified with fresh session keys");

    Ok(())
}

/// One complete login attempt over the logical message sequence.
fn login(
    record: &CredentialRecord,
    username: &str,
    password: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut client_side = ClientHandshake::<Sha256>::new(&G_3072, username, password);
    let mut server_side = ServerHandshake::<Sha256>::new(&G_3072, record);

    let hello = client_side.hello()?;
    let challenge = server_side.receive_hello(&hello)?;
    let proof = client_side.receive_challenge(&challenge)?;
    let reply = server_side.receive_proof(&proof)?;
    let key = client_side.finish(&reply)?;

    assert_eq!(Some(key.as_str()), server_side.session_key());
    Ok(key)
}
