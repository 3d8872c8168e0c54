use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use geekplay_trust::token::{
    IssuedToken, PrincipalSeed, Role, TokenClaims, TokenCodec, TokenError, TokenIssuer,
};

/// Mint or inspect access tokens signed with the shared fleet secret.
///
/// Handy for calling the forum or admin routes by hand:
/// - `mint` prints a token for any user id / email / role
/// - `inspect` checks a token's signature and prints its claims
#[derive(Parser, Debug)]
#[command(name = "token-gen", version, about)]
struct Args {
    /// Base64-encoded HS256 secret (same value the services read from JWT_SECRET)
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    secret: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Issue a token
    Mint {
        #[arg(long)]
        user_id: i64,

        #[arg(long)]
        email: String,

        /// USER or ADMIN
        #[arg(long, default_value = "USER", value_parser = parse_role)]
        role: Role,

        #[arg(long, default_value_t = 86_400)]
        ttl_seconds: u64,

        /// Backdate issuance so the token is already expired
        #[arg(long, default_value_t = false)]
        expired: bool,

        /// Print only the token (no extra lines)
        #[arg(long, default_value_t = false)]
        quiet: bool,
    },
    /// Verify a token and print its claims
    Inspect { token: String },
}

fn parse_role(raw: &str) -> Result<Role, String> {
    Role::parse(raw).ok_or_else(|| format!("unknown role '{raw}', expected USER or ADMIN"))
}

fn mint(
    codec: TokenCodec,
    seed: &PrincipalSeed,
    ttl_seconds: u64,
    expired: bool,
) -> Result<IssuedToken> {
    let issuer = TokenIssuer::new(codec, ttl_seconds);
    let now = Utc::now().timestamp();
    let iat = if expired {
        let ttl = i64::try_from(ttl_seconds).context("ttl too large")?;
        now - ttl - 1
    } else {
        now
    };
    Ok(issuer.issue_at(seed, iat)?)
}

/// Claims plus whether they are still usable right now.
fn inspect(codec: &TokenCodec, token: &str) -> Result<(TokenClaims, bool)> {
    let claims = match codec.decode(token) {
        Ok(claims) => claims,
        Err(TokenError::InvalidSignature) => bail!("signature does not match this secret"),
        Err(e) => return Err(e.into()),
    };
    let valid = !claims.is_expired_at(Utc::now().timestamp());
    Ok((claims, valid))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let codec = TokenCodec::from_base64_secret(args.secret.trim())
        .context("secret is not valid base64")?;

    match args.command {
        Command::Mint {
            user_id,
            email,
            role,
            ttl_seconds,
            expired,
            quiet,
        } => {
            let seed = PrincipalSeed {
                user_id,
                email,
                role,
            };
            let issued = mint(codec, &seed, ttl_seconds, expired)?;

            if quiet {
                println!("{}", issued.token);
            } else {
                println!("token:      {}", issued.token);
                println!("user_id:    {}", seed.user_id);
                println!("role:       {}", seed.role);
                println!("expires_at: {}", issued.expires_at);
                println!();
                println!("Authorization: Bearer {}", issued.token);
            }
        }
        Command::Inspect { token } => {
            let (claims, valid) = inspect(&codec, token.trim())?;
            println!("{}", serde_json::to_string_pretty(&claims)?);
            println!("status: {}", if valid { "valid" } else { "expired" });
        }
    }

    Ok(())
}
