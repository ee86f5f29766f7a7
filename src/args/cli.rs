use clap::Parser;

/// Runtime options for one planet node.
///
/// Every option doubles as an environment variable so the node can be
/// configured the same way whether it runs from a shell or a pod spec.
/// Numeric and boolean options are taken as raw strings here and resolved
/// leniently in [`crate::config::NodeConfig::resolve`]: a garbage value
/// falls back to its default instead of refusing to start.
#[derive(Debug, Parser, Clone, Default)]
#[clap(
    version,
    about = "Simulated planet-node runtime: polls fleet orders, streams cargo traffic bursts between planets, and serves chaos-injected docking requests."
)]
pub struct NodeArgs {
    /// Identity of this planet node; the mission dispatch loop is disabled when unset
    #[arg(long = "planet-id", env = "PLANET_ID", help_heading = "Node")]
    pub planet_id: Option<String>,

    /// Base URL of the fleet control-plane API
    #[arg(
        long = "fleet-api-base-url",
        env = "FLEET_API_BASE_URL",
        default_value = "http://localhost:4006/api/fleet",
        help_heading = "Fleet"
    )]
    pub fleet_api_base_url: String,

    /// Fleet API request timeout in seconds (0.1-30)
    #[arg(
        long = "fleet-timeout-seconds",
        env = "FLEET_API_TIMEOUT_SECONDS",
        value_name = "SECONDS",
        help_heading = "Fleet"
    )]
    pub fleet_timeout_seconds: Option<String>,

    /// Interval between fleet order polls in seconds (0.5-120)
    #[arg(
        long = "mission-poll-interval-seconds",
        env = "MISSION_POLL_INTERVAL_SECONDS",
        value_name = "SECONDS",
        help_heading = "Dispatch"
    )]
    pub mission_poll_interval_seconds: Option<String>,

    /// Per-request timeout for outbound docking traffic in seconds (0.5-60)
    #[arg(
        long = "mission-dispatch-timeout-seconds",
        env = "MISSION_DISPATCH_TIMEOUT_SECONDS",
        value_name = "SECONDS",
        help_heading = "Dispatch"
    )]
    pub mission_dispatch_timeout_seconds: Option<String>,

    /// URL template for reaching peer planets; `{planet}` expands to the slugged destination id
    #[arg(
        long = "planet-service-template",
        env = "PLANET_SERVICE_TEMPLATE",
        default_value = "http://{planet}-service",
        help_heading = "Dispatch"
    )]
    pub planet_service_template: String,

    /// Enable the nebula latency stage for inbound traffic
    #[arg(
        long = "nebula-enabled",
        env = "NEBULA_ENABLED",
        value_name = "BOOL",
        help_heading = "Chaos"
    )]
    pub nebula_enabled: Option<String>,

    /// Nebula latency applied to each inbound request, in milliseconds
    #[arg(
        long = "nebula-density",
        env = "NEBULA_DENSITY",
        value_name = "MS",
        help_heading = "Chaos"
    )]
    pub nebula_density_ms: Option<String>,

    /// Enable random failure injection for inbound traffic
    #[arg(
        long = "chaos-experiments-enabled",
        env = "CHAOS_EXPERIMENTS_ENABLED",
        value_name = "BOOL",
        help_heading = "Chaos"
    )]
    pub chaos_experiments_enabled: Option<String>,

    /// Probability (0.0-1.0) that a non-exempt request fails when chaos is enabled
    #[arg(
        long = "chaos-failure-rate",
        env = "CHAOS_FAILURE_RATE",
        value_name = "RATE",
        allow_hyphen_values = true,
        help_heading = "Chaos"
    )]
    pub chaos_failure_rate: Option<String>,

    /// TCP port the node listens on
    #[arg(long = "port", env = "PORT", value_name = "PORT", help_heading = "Node")]
    pub port: Option<String>,

    /// Enable debug logging (overridden by SPACEPORT_LOG / RUST_LOG)
    #[arg(long, short)]
    pub verbose: bool,
}
