/// Compile-time constants for the tracked token and the cold-start value

/// Contract address of the tracked token on Base
pub const TOKEN_ADDRESS: &str = "0x774EAeFE73Df7959496Ac92a77279A8D7d690b07";

/// Indexer chain slug for Base mainnet
pub const TOKEN_CHAIN: &str = "base-mainnet";

/// Holder count served when no tier has ever held a record
pub const BOOTSTRAP_HOLDER_COUNT: u64 = 1427;

/// When the bootstrap count was last known to be accurate (RFC 3339)
pub const BOOTSTRAP_TIMESTAMP: &str = "2025-01-01T00:00:00Z";

/// Smallest count accepted as a real reading
pub const MIN_PLAUSIBLE_COUNT: u64 = 1;

/// Exclusive upper bound for a plausible holder count
pub const DEFAULT_MAX_PLAUSIBLE_COUNT: u64 = 1_000_000;

/// Minimum spacing between two source chain passes
pub const DEFAULT_MIN_ATTEMPT_INTERVAL_SECS: u64 = 30;

/// Browser identity presented to explorer pages
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/14.0 Mobile/15E148 Safari/604.1";

/// keccak256("Transfer(address,address,uint256)")
pub const ERC20_TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

/// Zero address topic (mint source / burn sink)
pub const ZERO_ADDRESS_TOPIC: &str =
    "0x0000000000000000000000000000000000000000000000000000000000000000";
