// SPDX-License-Identifier: Apache-2.0

use base64::{engine::general_purpose, Engine as _};
use clap::Parser;
use jwstoken::session::Challenge;
use jwstoken::store::{CallerIdentity, MemoTrustAnchorStore};
use jwstoken::token::{AttestationStatement, Evidence, StatementValidator};
use std::error::Error;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser)]
enum JwsTokenCli {
    Verify(VerifyArgs),
    Appraise(AppraiseArgs),
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Cryptographically verify the supplied attestation token: \
    certificate chain against the pinned trust anchors, then the token \
    signature")]
struct VerifyArgs {
    #[arg(short, long, default_value = "token.jws")]
    evidence: String,

    #[arg(short, long, default_value = "anchors.pem")]
    tastore: String,

    #[arg(short, long, default_value = "attest.android.com")]
    identity: String,
}

#[derive(Debug, clap::Args)]
#[command(author, version, long_about = None,
    about = "Verify the supplied attestation token, then appraise its \
    statement against the originating challenge and the expected caller \
    identity")]
struct AppraiseArgs {
    #[arg(short, long, default_value = "token.jws")]
    evidence: String,

    #[arg(short, long, default_value = "anchors.pem")]
    tastore: String,

    #[arg(short, long, default_value = "attest.android.com")]
    identity: String,

    #[arg(short, long, default_value = "caller.json")]
    caller: String,

    /// the challenge sent with the verification request, base64url
    #[arg(short = 'n', long)]
    challenge: String,

    /// request time, unix milliseconds (defaults to now)
    #[arg(short, long)]
    request_time: Option<i64>,
}

fn main() {
    tracing_subscriber::fmt::init();

    match JwsTokenCli::parse() {
        JwsTokenCli::Verify(args) => match verify(&args) {
            Ok(s) => {
                println!("verification successful");
                print_statement(&s);
            }
            Err(e) => eprintln!("verification failed: {e}"),
        },

        JwsTokenCli::Appraise(args) => match appraise(&args) {
            Ok(s) => {
                println!("appraisal successful");
                print_statement(&s);
            }
            Err(e) => eprintln!("appraisal failed: {e}"),
        },
    }
}

fn unix_time_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64)
}

fn verify(args: &VerifyArgs) -> Result<AttestationStatement, Box<dyn Error>> {
    let pem = fs::read_to_string(&args.tastore)?;

    let mut tas: MemoTrustAnchorStore = Default::default();
    tas.load_pem(&pem)?;

    let raw = fs::read_to_string(&args.evidence)?;

    let e = Evidence::decode(raw.trim())?;

    Ok(e.verify(&tas, &args.identity, unix_time_ms())?)
}

fn appraise(args: &AppraiseArgs) -> Result<AttestationStatement, Box<dyn Error>> {
    let statement = verify(&VerifyArgs {
        evidence: args.evidence.clone(),
        tastore: args.tastore.clone(),
        identity: args.identity.clone(),
    })?;

    let j = fs::read_to_string(&args.caller)?;
    let caller = CallerIdentity::load_json(&j)?;

    let request_time = args.request_time.unwrap_or_else(unix_time_ms);
    let challenge = Challenge {
        value: general_purpose::URL_SAFE_NO_PAD.decode(&args.challenge)?,
        created_at_ms: request_time,
        fingerprint: String::new(),
    };

    StatementValidator::new(caller).validate(&statement, &challenge, request_time)?;

    Ok(statement)
}

fn print_statement(s: &AttestationStatement) {
    if let Some(ts) = s.timestamp_ms {
        println!("  evaluated at:    {ts} ms");
    }
    if let Some(pkg) = &s.apk_package_name {
        println!("  caller package:  {pkg}");
    }
    for d in s.cert_digests() {
        println!("  signing digest:  {}", hex::encode(d));
    }
    println!("  profile match:   {}", s.cts_profile_match);
    println!("  basic integrity: {}", s.basic_integrity);
    if let Some(t) = &s.evaluation_type {
        println!("  evaluation type: {t}");
    }
    if let Some(advice) = &s.advice {
        println!("  advice:          {advice}");
    }
}
