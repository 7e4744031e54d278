//! Payment gateways used polymorphically, with simulated latency.

mod common;

use common::TestContext;
use lifeline_lib::payments::{AlwaysApprove, ApprovalPolicy};
use lifeline_lib::prelude::*;
use std::time::Duration;
use tokio::time::Instant;

fn gateways(policy: Arc<dyn ApprovalPolicy>, config: &PaymentConfig) -> Vec<(Box<dyn PaymentGateway>, CredentialPayload)> {
    vec![
        (
            Box::new(CardGateway::new(config).with_policy(policy.clone())) as Box<dyn PaymentGateway>,
            CredentialPayload::card("5500 0000 0000 0004", "321"),
        ),
        (
            Box::new(UpiGateway::new(config).with_policy(policy)) as Box<dyn PaymentGateway>,
            CredentialPayload::upi("alice@hdfc", "1234"),
        ),
    ]
}

#[test]
fn test_card_validation_examples() {
    let card = CardGateway::default();
    assert!(!card.validate(&CredentialPayload::card("123456789012", "123")).is_valid());
    assert!(card.validate(&CredentialPayload::card("4111 1111 1111 1111", "123")).is_valid());
    assert!(!card.validate(&CredentialPayload::card("4111111111111111", "1a3")).is_valid());
}

#[test]
fn test_upi_validation_examples() {
    let upi = UpiGateway::default();
    assert!(!upi.validate(&CredentialPayload::upi("nameatbank", "1234")).is_valid());
    assert!(upi.validate(&CredentialPayload::upi("alice@hdfc", "1234")).is_valid());
    assert!(!upi.validate(&CredentialPayload::upi("alice@hdfc", "12")).is_valid());
}

#[tokio::test(start_paused = true)]
async fn test_zero_amount_never_gets_transaction_id() {
    let config = PaymentConfig::default();
    for (gateway, payload) in gateways(Arc::new(AlwaysApprove), &config) {
        for _ in 0..20 {
            let tx = gateway.authorize("Asha", &Amount::zero(), &payload).await.unwrap();
            assert_eq!(tx.status, PaymentStatus::Declined);
            assert!(tx.transaction_id.is_none());
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_default_rates_with_valid_input_both_backends() {
    // Real RandomApproval at the configured rates; only the prefix is fixed.
    let config = PaymentConfig::default();
    let registry = GatewayRegistry::with_defaults(&config);
    let cases = [
        ("card", CredentialPayload::card("4111111111111111", "123"), "TXN"),
        ("upi", CredentialPayload::upi("alice@hdfc", "1234"), "UPI"),
    ];
    for (name, payload, prefix) in cases {
        let gateway = registry.get_required(name).unwrap();
        let tx = gateway
            .authorize("Asha", &Amount::from_units(100), &payload)
            .await
            .unwrap();
        assert_eq!(tx.gateway, name);
        match tx.status {
            PaymentStatus::Approved => assert!(tx.transaction_id.unwrap().starts_with(prefix)),
            PaymentStatus::Declined => assert!(tx.transaction_id.is_none()),
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_authorize_waits_simulated_latency() {
    let config = PaymentConfig::default();
    for (gateway, payload) in gateways(Arc::new(AlwaysApprove), &config) {
        let started = Instant::now();
        let tx = gateway.authorize("Asha", &Amount::from_units(1), &payload).await.unwrap();
        let waited = started.elapsed();
        assert!(tx.is_approved());
        assert!(waited >= Duration::from_millis(800), "waited {:?}", waited);
        assert!(waited <= Duration::from_millis(1001), "waited {:?}", waited);
    }
}

#[tokio::test(start_paused = true)]
async fn test_invalid_input_declines_without_waiting() {
    let card = CardGateway::default().with_policy(Arc::new(AlwaysApprove));
    let started = Instant::now();
    let tx = card
        .authorize("Asha", &Amount::from_units(1), &CredentialPayload::card("1", "1"))
        .await
        .unwrap();
    assert!(!tx.is_approved());
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_contribution_through_registry_choice() {
    let ctx = TestContext::in_memory();
    let charity = ctx.signed_in("trust", "charity").await;
    let donor = ctx.signed_in("asha", "donor").await;

    ctx.charity
        .create_charity(
            &charity,
            CharityDraft {
                name: "Lifeline Trust".into(),
                description: "Dialysis support".into(),
                contact: "trust@example.org".into(),
            },
        )
        .await
        .unwrap();
    let campaign = ctx
        .charity
        .create_campaign(
            &charity,
            CampaignDraft {
                title: "Dialysis unit".into(),
                goal: Amount::from_units(150),
            },
        )
        .await
        .unwrap();

    let config = PaymentConfig::default();
    let registry = GatewayRegistry::new();
    registry.register(Arc::new(CardGateway::new(&config).with_policy(Arc::new(AlwaysApprove))));
    registry.register(Arc::new(UpiGateway::new(&config).with_policy(Arc::new(AlwaysApprove))));

    let paid_by_card = ctx
        .charity
        .contribute(
            &donor,
            campaign.id,
            registry.get_required("card").unwrap().as_ref(),
            &CredentialPayload::card("4111111111111111", "123"),
            Amount::from_units(100),
        )
        .await
        .unwrap();
    assert!(paid_by_card.is_approved());

    let paid_by_upi = ctx
        .charity
        .contribute(
            &charity,
            campaign.id,
            registry.get_required("upi").unwrap().as_ref(),
            &CredentialPayload::upi("trust@sbi", "654321"),
            Amount::from_units(50),
        )
        .await
        .unwrap();
    assert!(paid_by_upi.campaign.goal_reached());

    let listed = ctx.charity.list_campaigns(&donor).await.unwrap();
    assert_eq!(listed[0].raised, Amount::from_units(150));
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_contribution_leaves_no_trace() {
    let ctx = TestContext::in_memory();
    let charity = ctx.signed_in("trust", "charity").await;
    let donor = ctx.signed_in("asha", "donor").await;
    ctx.charity
        .create_charity(
            &charity,
            CharityDraft {
                name: "Trust".into(),
                description: String::new(),
                contact: "t@example.org".into(),
            },
        )
        .await
        .unwrap();
    let campaign = ctx
        .charity
        .create_campaign(
            &charity,
            CampaignDraft {
                title: "Ambulance".into(),
                goal: Amount::from_units(10),
            },
        )
        .await
        .unwrap();

    let card = CardGateway::new(&PaymentConfig::default()).with_policy(Arc::new(AlwaysApprove));
    let payload = CredentialPayload::card("4111111111111111", "123");
    let outcome = {
        let pending = ctx
            .charity
            .contribute(&donor, campaign.id, &card, &payload, Amount::from_units(10));
        tokio::time::timeout(Duration::from_millis(400), pending).await
    };
    assert!(outcome.is_err());

    let stored = ctx.charity.campaign(&donor, campaign.id).await.unwrap();
    assert!(stored.raised.is_zero());
    assert!(!stored.goal_reached());
}
