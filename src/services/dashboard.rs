//! Dashboard controller: owns the invoice list, the stats summary and the
//! two transient banners for the lifetime of one view.

use std::time::Duration;
use tokio::time::Instant;

use crate::models::{Invoice, InvoiceStats};
use crate::services::invoice_service::{Fetched, InvoiceSource};
use crate::services::sample::{sample_invoices, sample_stats};

pub const LOAD_ERROR: &str = "Impossible de charger les données. Veuillez réessayer plus tard.";
pub const UPLOAD_ERROR: &str = "Erreur lors du téléchargement. Veuillez réessayer.";

#[derive(Debug, Clone)]
struct Banner {
    message: String,
    expires_at: Option<Instant>,
}

/// A banner that is either idle or visible. Visible banners go back to idle
/// when their deadline passes or when dismissed.
#[derive(Debug, Clone, Default)]
pub struct BannerSlot {
    current: Option<Banner>,
}

impl BannerSlot {
    pub fn show(&mut self, message: impl Into<String>, ttl: Duration) {
        self.current = Some(Banner {
            message: message.into(),
            expires_at: Some(Instant::now() + ttl),
        });
    }

    /// Stays until dismissed or replaced.
    pub fn show_sticky(&mut self, message: impl Into<String>) {
        self.current = Some(Banner {
            message: message.into(),
            expires_at: None,
        });
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Clears the banner once its deadline is reached. Returns true if it
    /// was cleared.
    pub fn expire(&mut self) -> bool {
        let expired = matches!(
            &self.current,
            Some(Banner { expires_at: Some(deadline), .. }) if Instant::now() >= *deadline
        );
        if expired {
            self.current = None;
        }
        expired
    }

    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|banner| banner.message.as_str())
    }
}

/// Identifies the view generation an async request was issued for. Results
/// carrying an outdated ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

pub struct Dashboard {
    invoices: Vec<Invoice>,
    stats: Option<InvoiceStats>,
    loading: bool,
    uploading: bool,
    error: BannerSlot,
    success: BannerSlot,
    banner_delay: Duration,
    generation: u64,
    mounted: bool,
    // Uploads that completed while the initial fetch was in flight.
    uploaded_during_load: Vec<Invoice>,
    // Set when a post-upload stats refresh landed before the initial fetch.
    refreshed_during_load: bool,
}

impl Dashboard {
    pub fn new(banner_delay: Duration) -> Self {
        Dashboard {
            invoices: Vec::new(),
            stats: None,
            loading: true,
            uploading: false,
            error: BannerSlot::default(),
            success: BannerSlot::default(),
            banner_delay,
            generation: 0,
            mounted: true,
            uploaded_during_load: Vec::new(),
            refreshed_during_load: false,
        }
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn stats(&self) -> Option<&InvoiceStats> {
        self.stats.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.message()
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success.message()
    }

    fn accepts(&self, ticket: LoadTicket) -> bool {
        self.mounted && ticket.0 == self.generation
    }

    /// Starts a fresh load. Any result still in flight for an earlier ticket
    /// will be ignored.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        self.uploaded_during_load.clear();
        self.refreshed_during_load = false;
        LoadTicket(self.generation)
    }

    /// Applies the initial fetch. Returns false when the ticket is stale.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        invoices: Fetched<Vec<Invoice>>,
        stats: Fetched<InvoiceStats>,
    ) -> bool {
        if !self.accepts(ticket) {
            tracing::debug!(?ticket, "Dropping stale dashboard load");
            return false;
        }
        self.loading = false;

        // Anything uploaded or refreshed meanwhile is newer than this fetch.
        let has_uploads = !self.uploaded_during_load.is_empty();
        let keep_stats = has_uploads || self.refreshed_during_load;
        self.refreshed_during_load = false;

        let fetched = match invoices {
            Fetched::Ok(list) => list,
            Fetched::Empty if has_uploads => Vec::new(),
            Fetched::Empty => {
                tracing::info!("No invoices on record, showing sample data");
                sample_invoices()
            }
            Fetched::Failed(reason) => {
                tracing::warn!(reason = %reason, "Dashboard load failed, showing sample data");
                self.error.show_sticky(LOAD_ERROR);
                let fallback = if has_uploads { Vec::new() } else { sample_invoices() };
                self.invoices = self.keep_recent_uploads(fallback);
                return true;
            }
        };
        self.invoices = self.keep_recent_uploads(fetched);

        if !keep_stats {
            self.stats = Some(match stats {
                Fetched::Ok(stats) if !stats.is_empty() => stats,
                _ => sample_stats(),
            });
        }
        self.error.dismiss();
        true
    }

    fn keep_recent_uploads(&mut self, mut fetched: Vec<Invoice>) -> Vec<Invoice> {
        let recent = std::mem::take(&mut self.uploaded_during_load);
        fetched.retain(|invoice| !recent.iter().any(|r| r.id == invoice.id));
        let mut merged = recent;
        merged.extend(fetched);
        merged
    }

    pub async fn load<S: InvoiceSource>(&mut self, source: &S) -> bool {
        let ticket = self.begin_load();
        let (invoices, stats) = fetch_initial(source).await;
        self.finish_load(ticket, invoices, stats)
    }

    pub fn on_upload_start(&mut self) {
        self.uploading = true;
        self.error.dismiss();
        self.success.dismiss();
    }

    /// Puts the new invoice on top and returns the ticket to use for the
    /// follow-up stats refresh.
    pub fn on_upload_success(&mut self, invoice: Invoice) -> LoadTicket {
        self.success.show(
            format!("Facture téléchargée avec succès : {}", invoice.filename),
            self.banner_delay,
        );
        if self.loading {
            self.uploaded_during_load.insert(0, invoice.clone());
        }
        self.invoices.insert(0, invoice);
        LoadTicket(self.generation)
    }

    /// Best effort: a failed refresh keeps the current stats. A zeroed
    /// summary is applied as zeros.
    pub fn apply_stats_refresh(
        &mut self,
        ticket: LoadTicket,
        stats: Fetched<InvoiceStats>,
    ) -> bool {
        if !self.accepts(ticket) {
            return false;
        }
        let stats = match stats {
            Fetched::Ok(stats) => stats,
            Fetched::Empty => InvoiceStats::default(),
            Fetched::Failed(_) => return false,
        };
        if self.loading {
            self.refreshed_during_load = true;
        }
        self.stats = Some(stats);
        true
    }

    pub fn on_upload_error(&mut self, message: Option<String>) {
        let message = message.unwrap_or_else(|| UPLOAD_ERROR.to_string());
        self.error.show(message, self.banner_delay);
    }

    pub fn on_upload_end(&mut self) {
        self.uploading = false;
    }

    pub fn dismiss_error(&mut self) {
        self.error.dismiss();
    }

    pub fn dismiss_success(&mut self) {
        self.success.dismiss();
    }

    /// Returns true if a banner went away.
    pub fn expire_banners(&mut self) -> bool {
        let error = self.error.expire();
        let success = self.success.expire();
        error || success
    }

    /// Ends the view. Results that arrive afterwards are dropped.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.generation += 1;
    }
}

/// Issues the invoice list and the stats requests concurrently.
pub async fn fetch_initial<S: InvoiceSource>(
    source: &S,
) -> (Fetched<Vec<Invoice>>, Fetched<InvoiceStats>) {
    tokio::join!(source.list_invoices(), source.invoice_stats())
}
