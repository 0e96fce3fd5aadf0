//! `pdl-client lookup`: look up a person's name in PDL.
//!
//! Builds a [`CallContext`] from the flags (propagated call id, consumer
//! id, principal) and runs one query through either the user client or,
//! with `--system`, the client-credentials system client.

use std::path::Path;

use crate::cli::LookupArgs;
use crate::config;
use crate::context::{CallContext, Principal};
use crate::error::ClientError;
use crate::pdl::PdlService;

#[must_use]
pub fn call_context(args: &LookupArgs) -> CallContext {
    let mut principal = Principal::new(args.ident.clone());
    if let Some(ref token) = args.subject_token {
        principal = principal.with_token(token.clone());
    }

    let mut ctx = CallContext::new().with_principal(principal);
    if let Some(ref call_id) = args.call_id {
        ctx = ctx.with_call_id(call_id.clone());
    }
    if let Some(ref consumer_id) = args.consumer_id {
        ctx = ctx.with_consumer_id(consumer_id.clone());
    }
    ctx
}

pub async fn execute(config_path: &Path, args: LookupArgs) -> Result<(), ClientError> {
    let config = config::load(config_path).await?;
    let (http, provider) = super::transport(&config);
    let pdl = if args.system {
        PdlService::system(&config, http, provider)
    } else {
        PdlService::user(&config, http, provider)
    };

    let ctx = call_context(&args);
    tracing::info!(call_id = %ctx.call_id(), system = args.system, "looking up name");
    let name = pdl.lookup_name(&ctx).await?;

    if args.json {
        let json = serde_json::to_string_pretty(&name).map_err(std::io::Error::other)?;
        println!("{json}");
    } else {
        println!("{name}");
    }
    Ok(())
}
