//! Best-effort click event recording.

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use chrono_tz::Tz;

use crate::domain::click_context::ClickContext;
use crate::domain::clock::Clock;
use crate::domain::entities::{DeviceType, Link, NewAnalyticsEvent};
use crate::domain::repositories::AnalyticsRepository;

/// Zone used for event timestamps, resolved once from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
enum EventZone {
    Utc,
    Named(Tz),
}

/// Appends one [`NewAnalyticsEvent`] per resolved redirect.
///
/// Recording never fails from the caller's point of view: persistence errors
/// are logged and dropped so the redirect is unaffected.
pub struct AnalyticsRecorder {
    repository: Arc<dyn AnalyticsRepository>,
    clock: Arc<dyn Clock>,
    zone: EventZone,
}

impl AnalyticsRecorder {
    /// Creates a recorder writing timestamps in `time_zone`.
    ///
    /// `"UTC"` yields `2026-03-01T12:00:00.000Z`. Any IANA name yields the
    /// local time with its offset, e.g. `2026-03-01T13:00:00.000+01:00`. An
    /// unknown name is logged and treated as UTC.
    pub fn new(
        repository: Arc<dyn AnalyticsRepository>,
        clock: Arc<dyn Clock>,
        time_zone: &str,
    ) -> Self {
        let zone = if time_zone == "UTC" {
            EventZone::Utc
        } else {
            match time_zone.parse::<Tz>() {
                Ok(tz) => EventZone::Named(tz),
                Err(_) => {
                    tracing::warn!(time_zone, "Invalid time zone, falling back to UTC");
                    EventZone::Utc
                }
            }
        };

        Self {
            repository,
            clock,
            zone,
        }
    }

    pub async fn record(&self, ctx: &ClickContext, link: &Link) {
        let user_agent = ctx.user_agent.clone().unwrap_or_default();
        let event = NewAnalyticsEvent {
            link_id: link.id,
            ip_address: ctx.ip.clone().unwrap_or_default(),
            device_type: DeviceType::classify(&user_agent),
            user_agent,
            referer: ctx.referer.clone().unwrap_or_default(),
            geo: ctx.geo.clone(),
            timestamp: self.timestamp(self.clock.now()),
        };

        if let Err(e) = self.repository.insert(event).await {
            tracing::error!(
                short_code = %link.short_code,
                error = %e,
                "Analytics tracking failed"
            );
        }
    }

    fn timestamp(&self, now: DateTime<Utc>) -> String {
        match self.zone {
            EventZone::Utc => now.to_rfc3339_opts(SecondsFormat::Millis, true),
            EventZone::Named(tz) => now
                .with_timezone(&tz)
                .to_rfc3339_opts(SecondsFormat::Millis, false),
        }
    }
}
