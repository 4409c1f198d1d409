// generate_key.rs
// Prints a new master key for encrypting stored credentials

#[allow(dead_code)]
#[path = "services/credentials.rs"]
mod credentials;

use credentials::CredentialService;

fn main() {
    println!("Generating new encryption master key...\n");

    let key = CredentialService::generate_key();

    println!("✅ Key generated successfully!\n");
    println!("Add this to your .env file:");
    println!("─────────────────────────────────────────────────");
    println!("ENCRYPTION_MASTER_KEY={}", key);
    println!("─────────────────────────────────────────────────");
    println!("\n⚠️  IMPORTANT:");
    println!("  • Keep this key out of version control");
    println!("  • Changing it makes every stored credential unreadable,");
    println!("    so existing accounts can no longer log in");
}
