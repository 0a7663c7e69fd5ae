//! UTXO selection against the node wallet.

use tracing::{debug, warn};

use pastel_chain::Amount;
use pastel_rpc::{types::Unspent, WalletRpc};

use crate::{Config, Error};

/// The outputs chosen to fund one transaction, and their total value.
#[derive(Debug, Clone)]
pub(crate) struct Selection {
    pub inputs: Vec<Unspent>,
    pub total: Amount,
}

/// Pick spendable wallet outputs totaling at least `target`.
///
/// Eligibility: the output is spendable, not a coinbase reward, not held by
/// the burn address, and the wallet owns its address's key. Scanning stops
/// once `review_limit` eligible outputs have been inspected. The eligible
/// set is consumed in ascending confirmation order, freshest first.
///
/// Returns `None` when the wallet cannot reach `target`.
pub(crate) async fn select_unspent<R: WalletRpc>(
    rpc: &R,
    target: Amount,
    config: &Config,
) -> Result<Option<Selection>, Error> {
    let unspent = rpc.list_unspent().await?;

    let mut eligible = Vec::new();
    for utxo in unspent {
        if !utxo.spendable || utxo.generated || utxo.address == config.burn_address {
            continue;
        }
        let info = rpc.validate_address(&utxo.address).await?;
        if !info.ismine {
            continue;
        }
        eligible.push(utxo);
        if eligible.len() >= config.review_limit {
            break;
        }
    }
    eligible.sort_by_key(|utxo| utxo.confirmations);

    let mut inputs = Vec::new();
    let mut total = Amount::ZERO;
    for utxo in eligible {
        total = total.checked_add(utxo.amount).ok_or(Error::AmountRange)?;
        inputs.push(utxo);
        if total >= target {
            debug!(%total, %target, inputs = inputs.len(), "selected inputs");
            return Ok(Some(Selection { inputs, total }));
        }
    }
    warn!(%total, %target, "insufficient funds");
    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use pastel_chain::transaction;
    use pastel_rpc::types::{AddressInfo, DecodedTransaction, SignedTransaction};

    use super::*;

    /// A wallet view with a fixed unspent set; ownership is encoded in the
    /// address: anything starting with `Pt` is ours.
    struct FixedWallet {
        unspent: Vec<Unspent>,
        validations: Mutex<usize>,
    }

    impl FixedWallet {
        fn new(unspent: Vec<Unspent>) -> FixedWallet {
            FixedWallet {
                unspent,
                validations: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl WalletRpc for FixedWallet {
        async fn list_unspent(&self) -> Result<Vec<Unspent>, pastel_rpc::Error> {
            Ok(self.unspent.clone())
        }

        async fn validate_address(
            &self,
            address: &str,
        ) -> Result<AddressInfo, pastel_rpc::Error> {
            *self.validations.lock().expect("test lock") += 1;
            Ok(AddressInfo {
                ismine: address.starts_with("Pt"),
            })
        }

        async fn get_new_address(&self) -> Result<String, pastel_rpc::Error> {
            unimplemented!("not used by selection")
        }

        async fn unlock_all_unspent(&self) -> Result<(), pastel_rpc::Error> {
            unimplemented!("not used by selection")
        }

        async fn sign_raw_transaction(
            &self,
            _hex: &str,
        ) -> Result<SignedTransaction, pastel_rpc::Error> {
            unimplemented!("not used by selection")
        }

        async fn send_raw_transaction(
            &self,
            _hex: &str,
        ) -> Result<transaction::Hash, pastel_rpc::Error> {
            unimplemented!("not used by selection")
        }

        async fn get_raw_transaction(
            &self,
            _txid: &transaction::Hash,
        ) -> Result<String, pastel_rpc::Error> {
            unimplemented!("not used by selection")
        }

        async fn decode_raw_transaction(
            &self,
            _hex: &str,
        ) -> Result<DecodedTransaction, pastel_rpc::Error> {
            unimplemented!("not used by selection")
        }
    }

    fn utxo(address: &str, psl: f64, confirmations: i64) -> Unspent {
        Unspent {
            txid: transaction::Hash([confirmations as u8; 32]),
            vout: 0,
            address: address.to_string(),
            amount: Amount::from_psl(psl),
            confirmations,
            spendable: true,
            generated: false,
        }
    }

    #[tokio::test]
    async fn filters_and_prefers_fresh_outputs() {
        pastel_test::init();

        let config = Config::default();
        let mut coinbase = utxo("PtCoinbase", 5.0, 1);
        coinbase.generated = true;
        let mut frozen = utxo("PtFrozen", 5.0, 1);
        frozen.spendable = false;
        let wallet = FixedWallet::new(vec![
            utxo("PtOld", 1.0, 50),
            utxo(&config.burn_address.clone(), 9.0, 1),
            utxo("XxForeign", 9.0, 1),
            coinbase,
            frozen,
            utxo("PtFresh", 1.0, 2),
        ]);

        let selection = select_unspent(&wallet, Amount::from_psl(1.5), &config)
            .await
            .expect("selection should not error")
            .expect("funds are sufficient");

        // the fresh output is consumed first, the old one completes the sum
        assert_eq!(selection.inputs.len(), 2);
        assert_eq!(selection.inputs[0].address, "PtFresh");
        assert_eq!(selection.inputs[1].address, "PtOld");
        assert_eq!(selection.total, Amount::from_psl(2.0));
    }

    #[tokio::test]
    async fn insufficient_funds_is_none() {
        pastel_test::init();

        let config = Config::default();
        let wallet = FixedWallet::new(vec![utxo("PtOnly", 0.5, 1)]);

        let selection = select_unspent(&wallet, Amount::from_psl(1.0), &config)
            .await
            .expect("selection should not error");
        assert!(selection.is_none());
    }

    #[tokio::test]
    async fn review_limit_bounds_validation_calls() {
        pastel_test::init();

        let config = Config {
            review_limit: 3,
            ..Config::default()
        };
        let unspent = (0..10).map(|i| utxo("PtMany", 1.0, i)).collect();
        let wallet = FixedWallet::new(unspent);

        let selection = select_unspent(&wallet, Amount::from_psl(2.5), &config)
            .await
            .expect("selection should not error")
            .expect("three outputs cover the target");
        assert_eq!(selection.inputs.len(), 3);
        assert_eq!(*wallet.validations.lock().expect("test lock"), 3);
    }
}
