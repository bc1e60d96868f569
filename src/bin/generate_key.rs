// API key generation utility
//
// One-off operator tool: prints a fresh API key and the bcrypt hash to
// store in the environment. The key itself is shown only here and never
// persisted by the service.

use std::env;
use std::process::ExitCode;

use audio_api::keys;

fn main() -> ExitCode {
    let cost = env::var("BCRYPT_COST")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(bcrypt::DEFAULT_COST);

    let api_key = keys::generate_api_key();
    let hashed_key = match keys::hash_api_key(&api_key, cost) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("Failed to hash API key: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("{}", "=".repeat(60));
    println!("NEW API KEY GENERATED");
    println!("{}", "=".repeat(60));
    println!();
    println!("API Key (save this - shown only once!):");
    println!("{}", api_key);
    println!();
    println!("Hashed Key (set as API_KEY_HASH):");
    println!("API_KEY_HASH={}", hashed_key);
    println!();
    println!("Use the key in requests:");
    println!("  curl -H \"Authorization: Bearer {}\" ...", api_key);

    ExitCode::SUCCESS
}
