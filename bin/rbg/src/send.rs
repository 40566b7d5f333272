use clap::Parser;
use rng_game::{game::wait_for_inclusion, send_unchecked_transaction, TxRequest};

use crate::common::{LogArgs, NodeArgs, ReceiptArgs, Result};

/// Resolve and send an arbitrary transaction through the unchecked path
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Transaction request as JSON, e.g. `{"to": "0x…", "value": "0x1"}`. `from`, `to` and
    /// `gasLimit` may be omitted or given as names.
    #[arg(long = "tx", value_name = "JSON")]
    pub tx: String,

    /// Wait until the transaction is included
    #[arg(long = "wait")]
    pub wait: bool,

    /// Node connection
    #[command(flatten)]
    pub node_args: NodeArgs,

    /// Receipt polling
    #[command(flatten)]
    pub receipt_args: ReceiptArgs,

    /// Logging
    #[command(flatten)]
    pub log_args: LogArgs,
}

impl Cmd {
    /// Execute the send command
    pub async fn run(&self) -> Result<()> {
        let request = TxRequest::from_json(serde_json::from_str(&self.tx)?)?;
        let identity = self.node_args.connect().await?;

        let hash = send_unchecked_transaction(&identity, &request).await?;
        println!("{hash}");

        if self.wait {
            wait_for_inclusion(identity.node(), hash, self.receipt_args.receipt_policy()).await?;
            println!("Included");
        }
        Ok(())
    }
}
