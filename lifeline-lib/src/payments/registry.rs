//! Gateway lookup by name.
//!
//! Owned by the host application and passed where needed; there is no
//! process-wide registry.

use super::card::CardGateway;
use super::traits::PaymentGateway;
use super::upi::UpiGateway;
use crate::config::PaymentConfig;
use crate::{LifelineError, Result};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Registered payment gateways, keyed by [`PaymentGateway::gateway_name`].
///
/// # Example
///
/// ```
/// use lifeline_lib::config::PaymentConfig;
/// use lifeline_lib::payments::GatewayRegistry;
///
/// let registry = GatewayRegistry::with_defaults(&PaymentConfig::default());
/// assert!(registry.get("card").is_some());
/// assert!(registry.get("upi").is_some());
/// ```
pub struct GatewayRegistry {
    gateways: RwLock<HashMap<String, Arc<dyn PaymentGateway>>>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self {
            gateways: RwLock::new(HashMap::new()),
        }
    }

    /// Card and UPI gateways configured from `config`.
    pub fn with_defaults(config: &PaymentConfig) -> Self {
        let registry = Self::new();
        registry.register(Arc::new(CardGateway::new(config)));
        registry.register(Arc::new(UpiGateway::new(config)));
        registry
    }

    /// Add a gateway, replacing any with the same name.
    pub fn register(&self, gateway: Arc<dyn PaymentGateway>) {
        let name = gateway.gateway_name().to_string();
        let mut gateways = self.gateways.write().unwrap_or_else(|e| e.into_inner());
        gateways.insert(name, gateway);
    }

    pub fn unregister(&self, name: &str) -> Option<Arc<dyn PaymentGateway>> {
        let mut gateways = self.gateways.write().unwrap_or_else(|e| e.into_inner());
        gateways.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn PaymentGateway>> {
        let gateways = self.gateways.read().unwrap_or_else(|e| e.into_inner());
        gateways.get(name).cloned()
    }

    /// Like [`get`](Self::get), but a missing gateway is a validation error.
    pub fn get_required(&self, name: &str) -> Result<Arc<dyn PaymentGateway>> {
        self.get(name).ok_or_else(|| {
            LifelineError::validation("gateway", format!("no gateway named '{}'", name))
        })
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let gateways = self.gateways.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<_> = gateways.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.gateways.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for GatewayRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payments::traits::{CredentialPayload, PaymentTransaction, ValidationResult};
    use crate::Amount;
    use async_trait::async_trait;

    struct Voucher;

    #[async_trait]
    impl PaymentGateway for Voucher {
        fn gateway_name(&self) -> &str {
            "voucher"
        }

        fn validate(&self, payload: &CredentialPayload) -> ValidationResult {
            if payload.get("code").is_some() {
                ValidationResult::valid()
            } else {
                ValidationResult::invalid(vec!["code is required".into()])
            }
        }

        async fn authorize(
            &self,
            payer: &str,
            amount: &Amount,
            _payload: &CredentialPayload,
        ) -> Result<PaymentTransaction> {
            Ok(PaymentTransaction::approved("voucher", payer, *amount, "VCH1".into()))
        }
    }

    #[test]
    fn test_defaults_and_custom_gateway() {
        let registry = GatewayRegistry::with_defaults(&PaymentConfig::default());
        assert_eq!(registry.names(), vec!["card", "upi"]);

        registry.register(Arc::new(Voucher));
        assert_eq!(registry.len(), 3);
        let voucher = registry.get_required("voucher").unwrap();
        assert!(voucher.validate(&CredentialPayload::new().with("code", "X")).is_valid());

        assert!(registry.unregister("voucher").is_some());
        assert!(matches!(
            registry.get_required("voucher"),
            Err(LifelineError::Validation { .. })
        ));
    }
}
