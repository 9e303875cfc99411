//! HVCA API client: one thin method per endpoint.

use crate::{
    config::HvcaConfig,
    decode::{self, Page},
    error::{HvcaError, HvcaResult},
    executor::Executor,
    models::{
        AuthorisedEmails, CertInfo, CertMeta, CertificateRequest, Claim, ClaimAssertionInfo,
        ClaimStatus, HttpScheme, Pagination, Policy, RevocationReason, RevocationRequest,
        TimeWindow,
        claim::{DnsAssertion, EmailAssertion, HttpAssertion},
    },
    operation::{Operation, Reply},
};
use chrono::{DateTime, Utc};
use hvca_common::CallContext;
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// HVCA client. Cheap to clone; clones share the session and the
/// connection pool.
#[derive(Debug, Clone)]
pub struct HvcaClient {
    executor: Arc<Executor>,
}

impl HvcaClient {
    /// Create a client. No network call is made.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: &HvcaConfig) -> HvcaResult<Self> {
        Ok(Self {
            executor: Arc::new(Executor::new(config)?),
        })
    }

    /// Create a client and log in, so bad credentials surface immediately.
    ///
    /// # Errors
    ///
    /// Returns configuration errors or the login error.
    pub async fn connect(ctx: &CallContext, config: &HvcaConfig) -> HvcaResult<Self> {
        let client = Self::new(config)?;
        client.login(ctx).await?;
        Ok(client)
    }

    /// Force a login.
    ///
    /// # Errors
    ///
    /// Returns the login error; the session is cleared in that case.
    pub async fn login(&self, ctx: &CallContext) -> HvcaResult<()> {
        self.executor.login(ctx).await
    }

    /// The underlying executor, for calls not covered by a method here.
    #[must_use]
    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    // Certificates

    /// Request a certificate; returns its serial number.
    ///
    /// # Errors
    ///
    /// Returns API errors (e.g. 422 for policy violations) or
    /// [`HvcaError::Location`] if the response does not name the certificate.
    #[instrument(skip_all)]
    pub async fn certificate_request(
        &self,
        ctx: &CallContext,
        request: &CertificateRequest,
    ) -> HvcaResult<String> {
        let op = Operation::post("/certificates").with_json(request)?;
        let reply = self.executor.execute(ctx, &op).await?;
        let serial = decode::location_id(&reply)?;
        info!(%serial, "Certificate requested");
        Ok(serial)
    }

    /// Retrieve a certificate and its status.
    ///
    /// # Errors
    ///
    /// Returns API errors (404 for unknown serials) or decode errors.
    #[instrument(skip(self, ctx))]
    pub async fn certificate_retrieve(&self, ctx: &CallContext, serial: &str) -> HvcaResult<CertInfo> {
        let op = Operation::get(format!("/certificates/{serial}"));
        self.executor.execute_json(ctx, &op).await
    }

    /// Revoke a certificate.
    ///
    /// # Errors
    ///
    /// Returns API errors.
    #[instrument(skip(self, ctx))]
    pub async fn certificate_revoke(&self, ctx: &CallContext, serial: &str) -> HvcaResult<()> {
        let op = Operation::delete(format!("/certificates/{serial}"));
        self.executor.execute(ctx, &op).await?;
        info!("Certificate revoked");
        Ok(())
    }

    /// Revoke a certificate with a reason and optional effective time.
    ///
    /// # Errors
    ///
    /// Returns API errors.
    #[instrument(skip(self, ctx))]
    pub async fn certificate_revoke_with_reason(
        &self,
        ctx: &CallContext,
        serial: &str,
        reason: RevocationReason,
        time: Option<DateTime<Utc>>,
    ) -> HvcaResult<()> {
        let body = RevocationRequest {
            revocation_reason: reason,
            revocation_time: time.map(|t| t.timestamp()),
        };
        let op = Operation::patch(format!("/certificates/{serial}")).with_json(&body)?;
        self.executor.execute(ctx, &op).await?;
        info!("Certificate revoked");
        Ok(())
    }

    // Trust chain and policy

    /// PEM certificates of the issuing chain.
    ///
    /// # Errors
    ///
    /// Returns API or decode errors.
    pub async fn trust_chain(&self, ctx: &CallContext) -> HvcaResult<Vec<String>> {
        let reply = self.executor.execute(ctx, &Operation::get("/trustchain")).await?;
        decode::strings(&reply)
    }

    /// The account's validation policy.
    ///
    /// # Errors
    ///
    /// Returns API or decode errors.
    pub async fn policy(&self, ctx: &CallContext) -> HvcaResult<Policy> {
        self.executor
            .execute_json(ctx, &Operation::get("/validationpolicy"))
            .await
    }

    // Counters, quota and statistics

    /// Number of certificates issued by the account.
    ///
    /// # Errors
    ///
    /// Returns API or decode errors.
    pub async fn counter_certs_issued(&self, ctx: &CallContext) -> HvcaResult<i64> {
        self.value(ctx, "/counters/certificates/issued").await
    }

    /// Number of certificates revoked by the account.
    ///
    /// # Errors
    ///
    /// Returns API or decode errors.
    pub async fn counter_certs_revoked(&self, ctx: &CallContext) -> HvcaResult<i64> {
        self.value(ctx, "/counters/certificates/revoked").await
    }

    /// Remaining issuance quota.
    ///
    /// # Errors
    ///
    /// Returns API or decode errors.
    pub async fn quota_issuance(&self, ctx: &CallContext) -> HvcaResult<i64> {
        self.value(ctx, "/quotas/issuance").await
    }

    /// Certificates expiring within the window.
    ///
    /// # Errors
    ///
    /// Returns API, decode or `Total-Count` errors.
    pub async fn stats_expiring(
        &self,
        ctx: &CallContext,
        page: Pagination,
        window: TimeWindow,
    ) -> HvcaResult<Page<CertMeta>> {
        self.stats(ctx, "/stats/expiring", page, window).await
    }

    /// Certificates issued within the window.
    ///
    /// # Errors
    ///
    /// Returns API, decode or `Total-Count` errors.
    pub async fn stats_issued(
        &self,
        ctx: &CallContext,
        page: Pagination,
        window: TimeWindow,
    ) -> HvcaResult<Page<CertMeta>> {
        self.stats(ctx, "/stats/issued", page, window).await
    }

    /// Certificates revoked within the window.
    ///
    /// # Errors
    ///
    /// Returns API, decode or `Total-Count` errors.
    pub async fn stats_revoked(
        &self,
        ctx: &CallContext,
        page: Pagination,
        window: TimeWindow,
    ) -> HvcaResult<Page<CertMeta>> {
        self.stats(ctx, "/stats/revoked", page, window).await
    }

    // Domain claims

    /// Claims in the given state.
    ///
    /// # Errors
    ///
    /// Returns API, decode or `Total-Count` errors.
    pub async fn claims_domains(
        &self,
        ctx: &CallContext,
        page: Pagination,
        status: ClaimStatus,
    ) -> HvcaResult<Page<Claim>> {
        let op = page
            .apply(Operation::get("/claims/domains"))
            .with_query("status", status.as_str());
        let reply = self.executor.execute(ctx, &op).await?;
        decode::page(&reply)
    }

    /// Claim a domain; returns the token to publish.
    ///
    /// # Errors
    ///
    /// Returns API, decode or `Location` errors.
    #[instrument(skip(self, ctx))]
    pub async fn claim_submit(
        &self,
        ctx: &CallContext,
        domain: &str,
    ) -> HvcaResult<ClaimAssertionInfo> {
        self.assertion(ctx, Operation::post(format!("/claims/domains/{domain}")))
            .await
    }

    /// Retrieve a claim.
    ///
    /// # Errors
    ///
    /// Returns API or decode errors.
    pub async fn claim_retrieve(&self, ctx: &CallContext, id: &str) -> HvcaResult<Claim> {
        let op = Operation::get(format!("/claims/domains/{id}"));
        self.executor.execute_json(ctx, &op).await
    }

    /// Delete a claim.
    ///
    /// # Errors
    ///
    /// Returns API errors.
    #[instrument(skip(self, ctx))]
    pub async fn claim_delete(&self, ctx: &CallContext, id: &str) -> HvcaResult<()> {
        let op = Operation::delete(format!("/claims/domains/{id}"));
        self.executor.execute(ctx, &op).await?;
        Ok(())
    }

    /// Issue a fresh token for an existing claim.
    ///
    /// # Errors
    ///
    /// Returns API, decode or `Location` errors.
    #[instrument(skip(self, ctx))]
    pub async fn claim_reassert(
        &self,
        ctx: &CallContext,
        id: &str,
    ) -> HvcaResult<ClaimAssertionInfo> {
        self.assertion(ctx, Operation::post(format!("/claims/domains/{id}/reassert")))
            .await
    }

    /// Ask HVCA to look for the claim token in DNS. Returns `true` once the
    /// domain is verified.
    ///
    /// # Errors
    ///
    /// Returns API errors.
    #[instrument(skip(self, ctx))]
    pub async fn claim_dns(
        &self,
        ctx: &CallContext,
        id: &str,
        authorization_domain: &str,
    ) -> HvcaResult<bool> {
        let op = Operation::post(format!("/claims/domains/{id}/dns"))
            .with_json(&DnsAssertion { authorization_domain })?;
        self.verification(ctx, &op).await
    }

    /// Ask HVCA to fetch the claim token over HTTP(S). Returns `true` once
    /// the domain is verified.
    ///
    /// # Errors
    ///
    /// Returns API errors.
    #[instrument(skip(self, ctx))]
    pub async fn claim_http(
        &self,
        ctx: &CallContext,
        id: &str,
        authorization_domain: &str,
        scheme: HttpScheme,
    ) -> HvcaResult<bool> {
        let op = Operation::post(format!("/claims/domains/{id}/http")).with_json(
            &HttpAssertion {
                authorization_domain,
                scheme,
            },
        )?;
        self.verification(ctx, &op).await
    }

    /// Ask HVCA to send the claim token to an authorised address. Returns
    /// `true` once the domain is verified.
    ///
    /// # Errors
    ///
    /// Returns API errors.
    #[instrument(skip(self, ctx))]
    pub async fn claim_email(
        &self,
        ctx: &CallContext,
        id: &str,
        email_address: &str,
    ) -> HvcaResult<bool> {
        let op = Operation::post(format!("/claims/domains/{id}/email"))
            .with_json(&EmailAssertion { email_address })?;
        self.verification(ctx, &op).await
    }

    /// Addresses usable with [`Self::claim_email`].
    ///
    /// # Errors
    ///
    /// Returns API or decode errors.
    pub async fn claim_email_list(
        &self,
        ctx: &CallContext,
        id: &str,
    ) -> HvcaResult<AuthorisedEmails> {
        let op = Operation::get(format!("/claims/domains/{id}/email"));
        self.executor.execute_json(ctx, &op).await
    }

    async fn value(&self, ctx: &CallContext, path: &str) -> HvcaResult<i64> {
        let reply = self.executor.execute(ctx, &Operation::get(path)).await?;
        decode::value(&reply)
    }

    async fn stats(
        &self,
        ctx: &CallContext,
        path: &str,
        page: Pagination,
        window: TimeWindow,
    ) -> HvcaResult<Page<CertMeta>> {
        let op = window.apply(page.apply(Operation::get(path)));
        let reply = self.executor.execute(ctx, &op).await?;
        decode::page(&reply)
    }

    async fn assertion(&self, ctx: &CallContext, op: Operation) -> HvcaResult<ClaimAssertionInfo> {
        let reply = self.executor.execute(ctx, &op).await?;
        let mut info: ClaimAssertionInfo = decode::json(&reply)?;
        info.id = decode::location_id(&reply)?;
        debug!(id = %info.id, "Claim assertion token issued");
        Ok(info)
    }

    async fn verification(&self, ctx: &CallContext, op: &Operation) -> HvcaResult<bool> {
        let reply = self.executor.execute(ctx, op).await?;
        verified(&reply)
    }
}

/// 201 means verified, 204 means not verified yet.
fn verified(reply: &Reply) -> HvcaResult<bool> {
    match reply.status {
        StatusCode::CREATED => Ok(true),
        StatusCode::NO_CONTENT => Ok(false),
        other => Err(HvcaError::invalid_operation(format!(
            "unexpected verification status {other}"
        ))),
    }
}
