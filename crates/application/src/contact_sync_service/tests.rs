use std::sync::Arc;

use dynsync_core::{ConfigError, CredentialField, FormatIssue, SyncError, TransportError};
use dynsync_domain::{ContactFields, Credentials};

use crate::test_support::{
    CLIENT_ID, CONTACTS_URL, FakeCredentialStore, RESOURCE_URL, ScriptedTransport, TENANT_ID,
    TOKEN_URL, valid_credentials,
};
use crate::{
    ContactLookup, ContactSyncService, CrmClientConfig, CrmMethod, ProbeOutcome, UpsertOutcome,
};

const TOKEN_BODY: &str = r#"{"access_token":"abc"}"#;

async fn service_with(
    credentials: &Credentials,
) -> (
    ContactSyncService,
    Arc<FakeCredentialStore>,
    Arc<ScriptedTransport>,
) {
    let store = Arc::new(FakeCredentialStore::seeded(credentials).await);
    let transport = Arc::new(ScriptedTransport::default());
    let service = ContactSyncService::new(
        store.clone(),
        transport.clone(),
        CrmClientConfig::default(),
    );
    (service, store, transport)
}

fn jane() -> ContactFields {
    ContactFields {
        first_name: "Jane".to_owned(),
        last_name: "Doe".to_owned(),
        email: "jane@example.com".to_owned(),
        ..ContactFields::default()
    }
}

#[tokio::test]
async fn validate_config_returns_stored_credentials() {
    let (service, _, transport) = service_with(&valid_credentials()).await;

    let result = service.validate_config().await;

    assert_eq!(result, Ok(valid_credentials()));
    assert!(transport.requests().await.is_empty());
}

#[tokio::test]
async fn validate_config_reports_every_missing_field() {
    let (service, _, _) = service_with(&Credentials::new("", "", "", "")).await;

    let result = service.validate_config().await;

    assert_eq!(
        result,
        Err(ConfigError::MissingField(CredentialField::ALL.to_vec()))
    );
}

#[tokio::test]
async fn sync_creates_then_updates_the_same_contact() {
    let (service, _, transport) = service_with(&valid_credentials()).await;
    transport.respond(200, TOKEN_BODY).await;
    transport.respond(200, r#"{"value":[]}"#).await;
    transport.respond(201, "").await;

    let first = service.sync_contact("jane@example.com", &jane()).await;
    assert_eq!(first, Ok(UpsertOutcome::Created));

    transport.respond(200, TOKEN_BODY).await;
    transport
        .respond(
            200,
            r#"{"value":[{"contactid":"c1","firstname":"Jane","emailaddress1":"jane@example.com"}]}"#,
        )
        .await;
    transport.respond(204, "").await;

    let second = service.sync_contact("jane@example.com", &jane()).await;
    assert_eq!(
        second,
        Ok(UpsertOutcome::Updated {
            contact_id: "c1".to_owned()
        })
    );

    assert_eq!(transport.count(CrmMethod::Post, TOKEN_URL).await, 2);
    assert_eq!(transport.count(CrmMethod::Post, CONTACTS_URL).await, 1);
    assert_eq!(
        transport
            .count(CrmMethod::Patch, &format!("{CONTACTS_URL}(c1)"))
            .await,
        1
    );
}

#[tokio::test]
async fn missing_configuration_makes_no_network_call() {
    let credentials = Credentials::new(CLIENT_ID, "", TENANT_ID, RESOURCE_URL);
    let (service, _, transport) = service_with(&credentials).await;

    let sync = service.sync_contact("jane@example.com", &jane()).await;
    let fetch = service.fetch_contact("jane@example.com").await;
    let probe = service.test_connection().await;

    let expected = ConfigError::MissingField(vec![CredentialField::ClientSecret]);
    assert_eq!(sync, Err(SyncError::Config(expected.clone())));
    assert_eq!(fetch, Err(SyncError::Config(expected.clone())));
    assert_eq!(probe, ProbeOutcome::ConfigInvalid(expected));
    assert!(transport.requests().await.is_empty());
}

#[tokio::test]
async fn blank_email_is_rejected_before_any_call() {
    let (service, _, transport) = service_with(&valid_credentials()).await;

    let result = service.fetch_contact("   ").await;

    assert!(matches!(result, Err(SyncError::Form(_))));
    assert!(transport.requests().await.is_empty());
}

#[tokio::test]
async fn fetch_returns_the_existing_contact() {
    let (service, _, transport) = service_with(&valid_credentials()).await;
    transport.respond(200, TOKEN_BODY).await;
    transport
        .respond(
            200,
            r#"{"value":[{"contactid":"c1","firstname":"Jane","telephone1":null}]}"#,
        )
        .await;

    let result = service.fetch_contact("jane@example.com").await;

    assert!(matches!(
        result,
        Ok(ContactLookup::Found(contact))
            if contact.contact_id() == Some("c1")
                && contact.fields().first_name == "Jane"
                && contact.fields().phone.is_empty()
    ));
}

#[tokio::test]
async fn save_credentials_trims_and_persists_valid_values() {
    let (service, store, _) = service_with(&Credentials::new("", "", "", "")).await;
    let submitted = Credentials::new(
        format!("  {CLIENT_ID} "),
        "s3cr3t-s3cr3t-s3cr3t-s3cr3t-s3cr3t",
        TENANT_ID,
        "https://org.crm.dynamics.com/ ",
    );

    let result = service.save_credentials(&submitted).await;

    assert!(result.is_ok());
    let snapshot = store.snapshot().await;
    assert_eq!(
        snapshot.get("dynamics_client_id").map(String::as_str),
        Some(CLIENT_ID)
    );
    assert_eq!(
        snapshot.get("dynamics_resource_url").map(String::as_str),
        Some("https://org.crm.dynamics.com/")
    );
}

#[tokio::test]
async fn save_credentials_rejects_invalid_set_without_writing() {
    let (service, store, _) = service_with(&valid_credentials()).await;
    let submitted = Credentials::new(
        CLIENT_ID,
        "s3cr3t-s3cr3t-s3cr3t-s3cr3t-s3cr3t",
        TENANT_ID,
        "http://org.crm.dynamics.com",
    );

    let result = service.save_credentials(&submitted).await;

    assert_eq!(
        result,
        Err(ConfigError::InvalidFormat {
            field: CredentialField::ResourceUrl,
            reason: FormatIssue::NotHttps,
        })
    );
    assert_eq!(
        store
            .snapshot()
            .await
            .get("dynamics_resource_url")
            .map(String::as_str),
        Some(RESOURCE_URL)
    );
}

#[tokio::test]
async fn prefill_is_silent_when_unconfigured() {
    let (service, _, transport) = service_with(&Credentials::new("", "", "", "")).await;

    let prefill = service.prefill_contact("jane@example.com").await;

    assert_eq!(prefill.contact, None);
    assert_eq!(prefill.notice, None);
    assert!(transport.requests().await.is_empty());
}

#[tokio::test]
async fn prefill_reports_authentication_failure() {
    let (service, _, transport) = service_with(&valid_credentials()).await;
    transport.respond(400, r#"{"error":"invalid_client"}"#).await;

    let prefill = service.prefill_contact("jane@example.com").await;

    assert_eq!(prefill.contact, None);
    assert_eq!(
        prefill.notice.as_deref(),
        Some("Unable to authenticate with Microsoft Dynamics 365.")
    );
}

#[tokio::test]
async fn prefill_reports_network_failure() {
    let (service, _, transport) = service_with(&valid_credentials()).await;
    transport.respond(200, TOKEN_BODY).await;
    transport
        .fail(TransportError::Connect("connection reset".to_owned()))
        .await;

    let prefill = service.prefill_contact("jane@example.com").await;

    assert_eq!(
        prefill.notice.as_deref(),
        Some("Network error while connecting to Dynamics 365.")
    );
}

#[tokio::test]
async fn prefill_reports_lookup_failure() {
    let (service, _, transport) = service_with(&valid_credentials()).await;
    transport.respond(200, TOKEN_BODY).await;
    transport.respond(500, "boom").await;

    let prefill = service.prefill_contact("jane@example.com").await;

    assert_eq!(
        prefill.notice.as_deref(),
        Some("Unable to retrieve your information from Dynamics 365.")
    );
}

#[tokio::test]
async fn test_connection_uses_stored_credentials() {
    let (service, _, transport) = service_with(&valid_credentials()).await;
    transport.respond(200, TOKEN_BODY).await;
    transport.respond(403, "").await;

    let outcome = service.test_connection().await;

    assert_eq!(outcome, ProbeOutcome::Forbidden);
    assert_eq!(transport.count(CrmMethod::Get, CONTACTS_URL).await, 1);
}
