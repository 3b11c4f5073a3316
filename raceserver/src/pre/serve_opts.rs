use anyhow::Context;
use clap::Args;
use helpers::general::InputValueError;
use std::net::SocketAddr;

#[derive(Debug, Args, Clone)]
pub struct ServeOpts {
    /// Set the address the server listens on
    #[arg(short, long, default_value = "0.0.0.0:3000")]
    pub bind_address: String,

    /// Set the interval of the action sweep and broadcast in milliseconds
    #[arg(long, default_value_t = 50)]
    pub sweep_interval_ms: u64,

    /// Set the time in milliseconds after which an action axis without input is cleared
    #[arg(long, default_value_t = 250)]
    pub stale_after_ms: u64,
}

/// check_serve_opts assures that the inserted options are within reasonable limits and raises an
/// error if not.
pub fn check_serve_opts(serve_opts: &ServeOpts) -> anyhow::Result<()> {
    serve_opts
        .bind_address
        .parse::<SocketAddr>()
        .context(format!(
            "bind_address {} is not a valid socket address!",
            serve_opts.bind_address
        ))?;

    if !(1..=1000).contains(&serve_opts.sweep_interval_ms) {
        return Err(InputValueError).context(format!(
            "sweep_interval_ms is {}, which is not within the reasonable range of [1, 1000]!",
            serve_opts.sweep_interval_ms
        ));
    }

    if serve_opts.stale_after_ms < serve_opts.sweep_interval_ms {
        return Err(InputValueError).context(format!(
            "stale_after_ms ({}) must not be smaller than sweep_interval_ms ({})!",
            serve_opts.stale_after_ms, serve_opts.sweep_interval_ms
        ));
    }

    Ok(())
}
