use std::{
    fs,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use clap::{Parser, Subcommand};
use ed25519_dalek::{
    SigningKey,
    pkcs8::{DecodePrivateKey, EncodePrivateKey, spki::der::pem::LineEnding},
};
use rand_core::OsRng;
use serde_json::json;

mod jws;

/// Development tokens for the coffee shop API.
///
/// Stands in for the identity provider when running locally:
/// - `keygen` writes an Ed25519 private key (PKCS#8 PEM)
/// - `jwks` prints the key set to pass as AUTH_JWKS_JSON
/// - `sign` prints a bearer token carrying the given permissions
///
/// Tokens are signed with EdDSA. The API defaults to AUTH_ALGORITHMS=RS256,
/// so run it with AUTH_ALGORITHMS=EdDSA when trusting these keys.
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a new signing key
    Keygen {
        #[arg(long, value_name = "FILE")]
        out: PathBuf,

        /// Overwrite an existing file
        #[arg(long, default_value_t = false)]
        force: bool,
    },
    /// Print the JWKS document for a key
    ///
    /// Pass the output as AUTH_JWKS_JSON and start the API with
    /// AUTH_ALGORITHMS=EdDSA (the default RS256 rejects these keys).
    Jwks {
        #[arg(long, value_name = "FILE")]
        key: PathBuf,

        /// Key id. Default: RFC 7638 thumbprint of the key.
        #[arg(long)]
        kid: Option<String>,
    },
    /// Print a signed access token
    ///
    /// The token is EdDSA-signed. The API accepts it only with
    /// AUTH_ALGORITHMS=EdDSA and the matching `jwks` output as AUTH_JWKS_JSON.
    Sign {
        #[arg(long, value_name = "FILE")]
        key: PathBuf,

        #[arg(long)]
        kid: Option<String>,

        #[arg(long)]
        issuer: String,

        #[arg(long)]
        audience: String,

        #[arg(long, default_value = "auth0|dev-user")]
        subject: String,

        /// Repeatable, e.g. --permission get:drink-detail --permission post:drinks
        #[arg(long = "permission")]
        permissions: Vec<String>,

        /// Lifetime in seconds
        #[arg(long, default_value_t = 3600)]
        ttl: i64,
    },
}

fn now_unix() -> Result<i64, Box<dyn std::error::Error>> {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    Ok(i64::try_from(secs)?)
}

fn load_key(path: &Path) -> Result<SigningKey, Box<dyn std::error::Error>> {
    let pem = fs::read_to_string(path)?;
    Ok(SigningKey::from_pkcs8_pem(&pem)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Keygen { out, force } => {
            if out.exists() && !force {
                return Err(format!("{} exists (use --force to overwrite)", out.display()).into());
            }
            let key = SigningKey::generate(&mut OsRng);
            let pem = key.to_pkcs8_pem(LineEnding::LF)?;
            fs::write(&out, pem.as_bytes())?;

            eprintln!("wrote {} (kid {})", out.display(), jws::thumbprint(&key));
        }
        Command::Jwks { key, kid } => {
            let key = load_key(&key)?;
            let kid = kid.unwrap_or_else(|| jws::thumbprint(&key));

            println!("{}", serde_json::to_string(&jws::jwks(&key, &kid))?);
        }
        Command::Sign {
            key,
            kid,
            issuer,
            audience,
            subject,
            permissions,
            ttl,
        } => {
            let key = load_key(&key)?;
            let kid = kid.unwrap_or_else(|| jws::thumbprint(&key));
            let iat = now_unix()?;

            let claims = json!({
                "iss": issuer,
                "aud": audience,
                "sub": subject,
                "iat": iat,
                "exp": iat.saturating_add(ttl),
                "permissions": permissions,
            });

            println!("{}", jws::sign(&key, &kid, &claims)?);
        }
    }

    Ok(())
}
