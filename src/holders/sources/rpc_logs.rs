/// Holder count rebuilt from ERC-20 `Transfer` logs over JSON-RPC
///
/// Fetches the head block, then walks `eth_getLogs` in fixed-size block
/// chunks from `from_block`, replaying every transfer into a balance map.
/// The count is the number of non-zero addresses with a positive balance.
/// Expensive and slow, so disabled unless configured with an RPC URL.
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use super::HolderStrategy;
use crate::constants::{ERC20_TRANSFER_TOPIC, ZERO_ADDRESS_TOPIC};
use crate::holders::client::HttpClient;
use crate::holders::errors::SourceError;
use crate::holders::types::{PlausibilityBounds, ProviderTag, TokenTarget};
use crate::logger::{self, LogTag};

pub const TIMEOUT_SECS: u64 = 20;

pub const DEFAULT_BLOCK_CHUNK_SIZE: u64 = 10_000;

pub const DEFAULT_MAX_CHUNKS: u32 = 50;

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
pub struct TransferLog {
    pub topics: Vec<String>,
    pub data: String,
}

/// Scan window settings
#[derive(Debug, Clone, Copy)]
pub struct ScanBudget {
    pub from_block: u64,
    pub block_chunk_size: u64,
    pub max_chunks: u32,
}

impl Default for ScanBudget {
    fn default() -> Self {
        Self {
            from_block: 0,
            block_chunk_size: DEFAULT_BLOCK_CHUNK_SIZE,
            max_chunks: DEFAULT_MAX_CHUNKS,
        }
    }
}

pub struct RpcLogsStrategy {
    http: HttpClient,
    rpc_url: Option<String>,
    budget: ScanBudget,
    bounds: PlausibilityBounds,
    timeout: Duration,
}

impl RpcLogsStrategy {
    pub fn new(
        http: HttpClient,
        rpc_url: Option<String>,
        budget: ScanBudget,
        bounds: PlausibilityBounds,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            rpc_url: rpc_url.filter(|u| !u.trim().is_empty()),
            budget,
            bounds,
            timeout,
        }
    }

    async fn call(&self, url: &str, method: &str, params: Value) -> Result<Value, SourceError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .client()
            .post(url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::HttpStatus {
                endpoint: url.to_string(),
                status: status.as_u16(),
            });
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Malformed(format!("{} response: {}", method, e)))?;

        if let Some(err) = parsed.error {
            return Err(SourceError::Malformed(format!(
                "{} failed ({}): {}",
                method, err.code, err.message
            )));
        }
        parsed
            .result
            .ok_or_else(|| SourceError::Malformed(format!("{} returned no result", method)))
    }

    async fn head_block(&self, url: &str) -> Result<u64, SourceError> {
        let result = self.call(url, "eth_blockNumber", json!([])).await?;
        let hex = result
            .as_str()
            .ok_or_else(|| SourceError::Malformed("eth_blockNumber is not a string".to_string()))?;
        parse_hex_u64(hex)
    }

    async fn transfer_logs(
        &self,
        url: &str,
        token: &TokenTarget,
        from: u64,
        to: u64,
    ) -> Result<Vec<TransferLog>, SourceError> {
        let params = json!([{
            "address": token.address,
            "fromBlock": format!("0x{:x}", from),
            "toBlock": format!("0x{:x}", to),
            "topics": [ERC20_TRANSFER_TOPIC],
        }]);
        let result = self.call(url, "eth_getLogs", params).await?;
        serde_json::from_value(result)
            .map_err(|e| SourceError::Malformed(format!("eth_getLogs entries: {}", e)))
    }
}

/// Block ranges `[from, to]` covering `from_block..=head`, or an error if
/// the budget cannot cover them
pub fn plan_chunks(budget: &ScanBudget, head: u64) -> Result<Vec<(u64, u64)>, SourceError> {
    if budget.from_block > head {
        return Ok(Vec::new());
    }
    let size = budget.block_chunk_size.max(1);
    let span = (head - budget.from_block).saturating_add(1);
    let needed = span.div_ceil(size);
    if needed > budget.max_chunks as u64 {
        return Err(SourceError::Malformed(format!(
            "log scan needs {} chunks, budget is {}",
            needed, budget.max_chunks
        )));
    }

    let mut chunks = Vec::with_capacity(needed as usize);
    let mut start = budget.from_block;
    while start <= head {
        let end = start.saturating_add(size - 1).min(head);
        chunks.push((start, end));
        if end == u64::MAX {
            break;
        }
        start = end + 1;
    }
    Ok(chunks)
}

pub fn parse_hex_u64(raw: &str) -> Result<u64, SourceError> {
    let digits = raw.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(digits, 16)
        .map_err(|_| SourceError::Malformed(format!("bad hex quantity '{}'", raw)))
}

/// Transfer amount from the log data word. Amounts wider than 128 bits are rejected.
pub fn parse_amount(data: &str) -> Result<u128, SourceError> {
    let digits = data.trim_start_matches("0x").trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }
    if digits.len() > 32 {
        return Err(SourceError::Malformed(format!("amount too wide: {}", data)));
    }
    u128::from_str_radix(digits, 16)
        .map_err(|_| SourceError::Malformed(format!("bad amount '{}'", data)))
}

/// Replay one transfer into the balance map
///
/// A debit larger than the replayed balance means history is incomplete.
pub fn apply_transfer(
    balances: &mut HashMap<String, u128>,
    log: &TransferLog,
) -> Result<(), SourceError> {
    if log.topics.len() < 3 {
        return Err(SourceError::Malformed("transfer log with too few topics".to_string()));
    }
    let from = log.topics[1].to_lowercase();
    let to = log.topics[2].to_lowercase();
    let amount = parse_amount(&log.data)?;

    if from != ZERO_ADDRESS_TOPIC {
        let balance = balances.entry(from).or_insert(0);
        let Some(remaining) = balance.checked_sub(amount) else {
            return Err(SourceError::Malformed(format!(
                "transfer of {} from {} exceeds known balance {}, scan must start at deployment",
                amount, log.topics[1], balance
            )));
        };
        *balance = remaining;
    }
    if to != ZERO_ADDRESS_TOPIC {
        let balance = balances.entry(to).or_insert(0);
        *balance = balance.saturating_add(amount);
    }
    Ok(())
}

pub fn count_holders(balances: &HashMap<String, u128>) -> u64 {
    balances
        .iter()
        .filter(|(address, balance)| **balance > 0 && address.as_str() != ZERO_ADDRESS_TOPIC)
        .count() as u64
}

#[async_trait]
impl HolderStrategy for RpcLogsStrategy {
    fn name(&self) -> &'static str {
        "rpc_logs"
    }

    fn provider(&self) -> ProviderTag {
        ProviderTag::RpcLogs
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, token: &TokenTarget) -> Result<u64, SourceError> {
        let Some(url) = &self.rpc_url else {
            return Err(SourceError::MissingCredentials("rpc_logs"));
        };

        let head = self.head_block(url).await?;
        let chunks = plan_chunks(&self.budget, head)?;

        let mut balances: HashMap<String, u128> = HashMap::new();
        let mut transfers = 0usize;
        for (from, to) in chunks {
            let logs = self.transfer_logs(url, token, from, to).await?;
            transfers += logs.len();
            for log in &logs {
                apply_transfer(&mut balances, log)?;
            }
        }

        let holders = count_holders(&balances);
        logger::debug(
            LogTag::Sources,
            &format!(
                "Replayed {} transfers up to block {}: {} holders",
                transfers, head, holders
            ),
        );

        self.bounds
            .accept(holders as i128)
            .ok_or(SourceError::OutOfRange(holders as i128))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn topic(n: u8) -> String {
        format!("0x{:0>64}", format!("{:x}", n))
    }

    fn transfer(from: &str, to: &str, amount: u128) -> TransferLog {
        TransferLog {
            topics: vec![ERC20_TRANSFER_TOPIC.to_string(), from.to_string(), to.to_string()],
            data: format!("0x{:064x}", amount),
        }
    }

    #[test]
    fn test_plan_chunks() {
        let budget = ScanBudget {
            from_block: 100,
            block_chunk_size: 50,
            max_chunks: 3,
        };
        assert_eq!(
            plan_chunks(&budget, 220).unwrap(),
            vec![(100, 149), (150, 199), (200, 220)]
        );
        assert!(plan_chunks(&budget, 260).is_err());
        assert!(plan_chunks(&budget, 50).unwrap().is_empty());
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex_u64("0x1b4").unwrap(), 436);
        assert_eq!(parse_hex_u64("0x").unwrap(), 0);
        assert!(parse_hex_u64("0xzz").is_err());
        assert_eq!(parse_amount(&format!("0x{:064x}", 5u128)).unwrap(), 5);
        assert!(parse_amount(&format!("0x1{}", "0".repeat(63))).is_err());
    }

    #[test]
    fn test_balances_and_holder_count() {
        let mut balances = HashMap::new();
        let (a, b, c) = (topic(0xa), topic(0xb), topic(0xc));

        // mint to a, a pays b, b sends everything to c, c burns part
        apply_transfer(&mut balances, &transfer(ZERO_ADDRESS_TOPIC, &a, 100)).unwrap();
        apply_transfer(&mut balances, &transfer(&a, &b, 40)).unwrap();
        apply_transfer(&mut balances, &transfer(&b, &c, 40)).unwrap();
        apply_transfer(&mut balances, &transfer(&c, ZERO_ADDRESS_TOPIC, 10)).unwrap();

        assert_eq!(balances[&a], 60);
        assert_eq!(balances[&b], 0);
        assert_eq!(balances[&c], 30);
        assert!(!balances.contains_key(ZERO_ADDRESS_TOPIC));
        assert_eq!(count_holders(&balances), 2);
    }

    #[test]
    fn test_overdraft_is_malformed() {
        let mut balances = HashMap::new();
        let (a, b) = (topic(0xa), topic(0xb));

        apply_transfer(&mut balances, &transfer(ZERO_ADDRESS_TOPIC, &a, 5)).unwrap();
        let err = apply_transfer(&mut balances, &transfer(&a, &b, 6)).unwrap_err();
        assert!(matches!(err, SourceError::Malformed(ref msg) if msg.contains("exceeds known balance")));
        assert_eq!(balances[&a], 5);
        assert!(!balances.contains_key(&b));

        // sender never seen in the scanned range
        let unseen = topic(0xc);
        assert!(apply_transfer(&mut balances, &transfer(&unseen, &b, 1)).is_err());
    }

    #[test]
    fn test_short_topics_rejected() {
        let mut balances = HashMap::new();
        let log = TransferLog {
            topics: vec![ERC20_TRANSFER_TOPIC.to_string()],
            data: "0x01".to_string(),
        };
        assert!(apply_transfer(&mut balances, &log).is_err());
    }

    #[tokio::test]
    async fn test_missing_rpc_url() {
        let s = RpcLogsStrategy::new(
            HttpClient::new(5).unwrap(),
            None,
            ScanBudget::default(),
            PlausibilityBounds::default(),
            Duration::from_secs(5),
        );
        assert_eq!(
            s.attempt(&TokenTarget::new("0xabc", "base-mainnet")).await,
            Err(SourceError::MissingCredentials("rpc_logs"))
        );
    }

    #[tokio::test]
    async fn test_replays_logs_over_rpc() {
        let mut server = mockito::Server::new_async().await;
        let head = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"method": "eth_blockNumber"})))
            .with_status(200)
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x9"}"#)
            .create_async()
            .await;

        let logs = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [
                {"topics": [ERC20_TRANSFER_TOPIC, ZERO_ADDRESS_TOPIC, topic(1)], "data": format!("0x{:064x}", 10u128)},
                {"topics": [ERC20_TRANSFER_TOPIC, topic(1), topic(2)], "data": format!("0x{:064x}", 4u128)},
                {"topics": [ERC20_TRANSFER_TOPIC, ZERO_ADDRESS_TOPIC, topic(3)], "data": format!("0x{:064x}", 1u128)}
            ]
        });
        let get_logs = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"method": "eth_getLogs"})))
            .with_status(200)
            .with_body(logs.to_string())
            .expect(1)
            .create_async()
            .await;

        let s = RpcLogsStrategy::new(
            HttpClient::new(5).unwrap(),
            Some(server.url()),
            ScanBudget {
                from_block: 0,
                block_chunk_size: 100,
                max_chunks: 1,
            },
            PlausibilityBounds::default(),
            Duration::from_secs(5),
        );

        let count = s
            .attempt(&TokenTarget::new("0xabc", "base-mainnet"))
            .await
            .unwrap();
        assert_eq!(count, 3);
        head.assert_async().await;
        get_logs.assert_async().await;
    }

    #[tokio::test]
    async fn test_scan_starting_mid_history_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"method": "eth_blockNumber"})))
            .with_status(200)
            .with_body(r#"{"jsonrpc":"2.0","id":1,"result":"0x9"}"#)
            .create_async()
            .await;

        // topic(1) spends tokens it never received in range
        let logs = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": [
                {"topics": [ERC20_TRANSFER_TOPIC, topic(1), topic(2)], "data": format!("0x{:064x}", 4u128)}
            ]
        });
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({"method": "eth_getLogs"})))
            .with_status(200)
            .with_body(logs.to_string())
            .create_async()
            .await;

        let s = RpcLogsStrategy::new(
            HttpClient::new(5).unwrap(),
            Some(server.url()),
            ScanBudget {
                from_block: 0,
                block_chunk_size: 100,
                max_chunks: 1,
            },
            PlausibilityBounds::default(),
            Duration::from_secs(5),
        );

        let result = s.attempt(&TokenTarget::new("0xabc", "base-mainnet")).await;
        assert!(matches!(result, Err(SourceError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_rpc_error_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32005,"message":"limit exceeded"}}"#)
            .create_async()
            .await;

        let s = RpcLogsStrategy::new(
            HttpClient::new(5).unwrap(),
            Some(server.url()),
            ScanBudget::default(),
            PlausibilityBounds::default(),
            Duration::from_secs(5),
        );
        assert!(matches!(
            s.attempt(&TokenTarget::new("0xabc", "base-mainnet")).await,
            Err(SourceError::Malformed(_))
        ));
    }
}
