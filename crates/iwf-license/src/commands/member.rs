//! `member` handler: one reconciliation run against the controller.

use tracing::debug;

use iwf_core::{Controller, DesiredState, DeviceSpec, Presence};

use crate::cli::{GlobalOpts, MemberArgs, StateArg};
use crate::config;
use crate::error::CliError;
use crate::output;

pub async fn handle(args: MemberArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let desired = desired_state(&args)?;

    let cfg = iwf_config::load_config()?;
    let profile_name = config::active_profile_name(global, &cfg);
    let controller_config = config::build_controller_config(&cfg, global, Some(&args))?;
    debug!(profile = %profile_name, url = %controller_config.url, "connecting");

    let controller = Controller::connect(controller_config)
        .await
        .map_err(|e| CliError::from(e).with_profile(&profile_name))?;
    let result = controller.reconcile(&desired).await;
    controller.disconnect().await;
    let outcome = result.map_err(|e| CliError::from(e).with_profile(&profile_name))?;

    let rendered =
        output::render_outcome(&global.output, &outcome, output::should_color(&global.color))?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

/// Validate arguments and build the desired state.
fn desired_state(args: &MemberArgs) -> Result<DesiredState, CliError> {
    if args.pool.trim().is_empty() {
        return Err(CliError::Validation {
            field: "pool".into(),
            reason: "pool name cannot be empty".into(),
        });
    }

    let mut devices = Vec::with_capacity(args.devices.len());
    for raw in &args.devices {
        if raw.trim().is_empty() {
            return Err(CliError::Validation {
                field: "device".into(),
                reason: "device identifiers cannot be empty".into(),
            });
        }
        let Ok(spec) = raw.parse::<DeviceSpec>();
        devices.push(spec);
    }

    let state = match args.state {
        StateArg::Present => Presence::Present,
        StateArg::Absent => Presence::Absent,
    };
    Ok(DesiredState::new(args.pool.trim(), devices, state).check_mode(args.check))
}
