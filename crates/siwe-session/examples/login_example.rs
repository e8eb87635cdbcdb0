/*
[INPUT]:  Provider base URL and account address
[OUTPUT]: Clock estimate and an established session
[POS]:    Examples - login flow demonstration
[UPDATE]: When login flow changes
*/

use std::sync::Arc;

use siwe_session::*;

/// Example: Session flow
///
/// 1. Map a provider description onto session settings
/// 2. Create the session manager with a signing capability
/// 3. Estimate the server clock offset
/// 4. Log in (issued-at taken from the server clock)
#[tokio::main]
async fn main() {
    println!("=== Sign-In Session Example ===\n");

    let base_url =
        std::env::var("SIWE_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());

    // Step 1: Session config
    let provider = ProviderConfig {
        base_url,
        network: Network::Alfajores,
        account_address: "0x0d8e461687b7d06f86ec348e0c270b0f279855f0".to_string(),
        api_key: None,
        timeout_ms: Some(5_000),
    };
    let config = match SessionConfig::from_provider(&provider) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Invalid provider config: {}", e);
            return;
        }
    };
    println!("✓ Login URL: {}", config.login_url);

    // Step 2: Session manager
    // In production, pass an EvmWalletSigner or your own MessageSigner.
    let signer = FnSigner::new(|message: String| async move {
        println!("--- message to sign ---\n{message}\n-----------------------");
        Ok::<_, SessionError>("0xsignature".to_string())
    });
    let manager = match SessionManager::new(config, Arc::new(signer)) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to create session manager: {}", e);
            return;
        }
    };
    println!("✓ Session manager created");

    // Step 3: Clock offset
    match manager.get_clock_diff_approx().await {
        Ok(diff) => println!("✓ Clock diff {}ms (±{}ms)", diff.diff, diff.max_error),
        Err(e) => println!("✗ Clock unavailable: {}", e),
    }

    // Step 4: Login
    match manager.login(LoginParams::default()).await {
        Ok(()) => println!("✓ Logged in, cookies: {:?}", manager.get_cookies()),
        Err(e) => println!("✗ Login failed: {}", e),
    }
}
