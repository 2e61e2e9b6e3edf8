//! Test doubles and common utilities for engine contract tests
//!
//! The doubles record every call so tests can assert on what the engine did
//! and, just as often, on what it did not do.

#![allow(dead_code)]

use cfdyn_core::config::{CloudflareCredentials, SyncConfig};
use cfdyn_core::error::{Error, Result};
use cfdyn_core::model::{
    DnsRecord, NotificationMessage, PublicIp, RecordType, RecordUpdate, UpdateResponse, Zone,
};
use cfdyn_core::traits::{DnsProvider, IpSource, Notifier};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared call log for one test
#[derive(Default)]
pub struct CallLog {
    pub zone_lookups: AtomicUsize,
    pub record_lookups: Mutex<Vec<(String, RecordType, String)>>,
    pub updates: Mutex<Vec<(String, String, RecordUpdate)>>,
    pub ip_lookups: AtomicUsize,
    pub notifications: Mutex<Vec<NotificationMessage>>,
}

impl CallLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn zone_lookup_count(&self) -> usize {
        self.zone_lookups.load(Ordering::SeqCst)
    }

    pub fn ip_lookup_count(&self) -> usize {
        self.ip_lookups.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> Vec<(String, String, RecordUpdate)> {
        self.updates.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<NotificationMessage> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn record_lookups(&self) -> Vec<(String, RecordType, String)> {
        self.record_lookups.lock().unwrap().clone()
    }
}

/// How the mock provider answers an update
#[derive(Clone)]
pub enum UpdateBehavior {
    Accept,
    Reject(Vec<String>),
    Fail,
}

/// A scripted DnsProvider
pub struct MockDnsProvider {
    zones: Vec<Zone>,
    records: Vec<DnsRecord>,
    update: UpdateBehavior,
    log: Arc<CallLog>,
}

impl MockDnsProvider {
    pub fn new(zones: Vec<Zone>, records: Vec<DnsRecord>, log: Arc<CallLog>) -> Self {
        Self {
            zones,
            records,
            update: UpdateBehavior::Accept,
            log,
        }
    }

    pub fn with_update(mut self, update: UpdateBehavior) -> Self {
        self.update = update;
        self
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        self.log.zone_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.zones.clone())
    }

    async fn list_records(
        &self,
        zone_id: &str,
        record_type: RecordType,
        record_name: &str,
    ) -> Result<Vec<DnsRecord>> {
        self.log.record_lookups.lock().unwrap().push((
            zone_id.to_string(),
            record_type,
            record_name.to_string(),
        ));
        Ok(self.records.clone())
    }

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<UpdateResponse> {
        self.log.updates.lock().unwrap().push((
            zone_id.to_string(),
            record_id.to_string(),
            update.clone(),
        ));

        match &self.update {
            UpdateBehavior::Accept => Ok(UpdateResponse {
                success: true,
                errors: Vec::new(),
            }),
            UpdateBehavior::Reject(errors) => Ok(UpdateResponse {
                success: false,
                errors: errors.clone(),
            }),
            UpdateBehavior::Fail => Err(Error::Transport {
                method: "PUT".to_string(),
                url: "mock://update".to_string(),
                message: "connection reset".to_string(),
            }),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// An IpSource that returns a fixed address
pub struct FixedIpSource {
    ip: &'static str,
    log: Arc<CallLog>,
}

impl FixedIpSource {
    pub fn new(ip: &'static str, log: Arc<CallLog>) -> Self {
        Self { ip, log }
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn current(&self) -> Result<PublicIp> {
        self.log.ip_lookups.fetch_add(1, Ordering::SeqCst);
        PublicIp::parse(self.ip)
    }

    fn source_name(&self) -> &'static str {
        "fixed"
    }
}

/// A Notifier that records messages, optionally failing every send
pub struct RecordingNotifier {
    fail: bool,
    log: Arc<CallLog>,
}

impl RecordingNotifier {
    pub fn new(log: Arc<CallLog>) -> Self {
        Self { fail: false, log }
    }

    pub fn failing(log: Arc<CallLog>) -> Self {
        Self { fail: true, log }
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &NotificationMessage) -> Result<()> {
        self.log.notifications.lock().unwrap().push(message.clone());
        if self.fail {
            return Err(Error::notification("push service unreachable"));
        }
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "recording"
    }
}

/// Config for `home.example.com`
pub fn home_config() -> SyncConfig {
    SyncConfig::new(
        "example.com",
        "home",
        CloudflareCredentials {
            email: "ops@example.com".to_string(),
            api_key: "test-key".to_string(),
        },
    )
}

pub fn zone(id: &str, name: &str) -> Zone {
    Zone {
        id: id.to_string(),
        name: name.to_string(),
    }
}

pub fn record(id: &str, name: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_string(),
        name: name.to_string(),
        content: content.to_string(),
    }
}
