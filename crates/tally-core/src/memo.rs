//! Memoized selectors
//!
//! `SelectorCache` keeps derived values for one snapshot, keyed by a SHA-256
//! fingerprint of everything the selectors read (document, transactions,
//! evaluation date, thresholds and taxonomy). Per-scope views are computed
//! lazily and reused until the fingerprint changes. `Dashboard` assembles
//! every view plus the health summaries for a snapshot.
//!
//! A free-standing snapshot is fingerprinted by its content. A `BudgetStore`
//! is fingerprinted by its instance and revision instead, so an unchanged
//! store costs no serialization of the transaction list.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::{InsightThresholds, TallyConfig};
use crate::error::Result;
use crate::health::HealthSummary;
use crate::insights::{generate_candidates, rank_insights, RankedInsights, ScopeInputs};
use crate::models::{Bucket, Scope, Taxonomy};
use crate::pace::{SpendPace, Timeline};
use crate::panel::{BucketPanel, BudgetPanels};
use crate::period::Period;
use crate::store::{BudgetSnapshot, BudgetStore};

fn config_fingerprint(
    mut hasher: Sha256,
    config: &TallyConfig,
    today: NaiveDate,
) -> Result<String> {
    hasher.update(serde_json::to_vec(&config.insights)?);
    hasher.update(serde_json::to_vec(&config.categories)?);
    hasher.update(today.to_string().as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Fingerprint of all selector inputs
pub fn snapshot_fingerprint(
    snapshot: &BudgetSnapshot,
    config: &TallyConfig,
    today: NaiveDate,
) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(b"snapshot");
    hasher.update(serde_json::to_vec(snapshot)?);
    config_fingerprint(hasher, config, today)
}

/// Fingerprint of a store's current state, without serializing it
pub fn store_fingerprint(
    store: &BudgetStore,
    config: &TallyConfig,
    today: NaiveDate,
) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(b"store");
    hasher.update(store.instance().to_le_bytes());
    hasher.update(store.revision().to_le_bytes());
    config_fingerprint(hasher, config, today)
}

/// Everything a presentation component needs for one scope
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScopeView {
    pub scope: Scope,
    pub label: String,
    pub panel: BucketPanel,
    pub pace: SpendPace,
    pub timeline: Timeline,
    pub insights: RankedInsights,
}

impl ScopeView {
    pub fn compute(
        scope: &Scope,
        label: impl Into<String>,
        panel: BucketPanel,
        period: &Period,
        today: NaiveDate,
        thresholds: &InsightThresholds,
    ) -> Self {
        let pace = SpendPace::compute(&panel, period, today);
        let timeline = Timeline::compute(period, today, pace.run_out_date);
        let inputs = ScopeInputs {
            scope,
            panel: &panel,
            pace: &pace,
            period,
            today,
        };
        let insights = rank_insights(generate_candidates(&inputs, thresholds));

        Self {
            scope: scope.clone(),
            label: label.into(),
            panel,
            pace,
            timeline,
            insights,
        }
    }
}

fn scope_label(scope: &Scope, taxonomy: &Taxonomy) -> String {
    match scope {
        Scope::Bucket(bucket) => bucket.label().to_string(),
        Scope::Category(id) => taxonomy
            .get(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.clone()),
    }
}

/// Memoization cache for one snapshot at a time
#[derive(Debug, Default)]
pub struct SelectorCache {
    fingerprint: Option<String>,
    today: Option<NaiveDate>,
    panels: Option<BudgetPanels>,
    views: HashMap<String, ScopeView>,
    hits: u64,
    misses: u64,
}

impl SelectorCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn sync(
        &mut self,
        snapshot: &BudgetSnapshot,
        config: &TallyConfig,
        today: NaiveDate,
    ) -> Result<()> {
        let fingerprint = snapshot_fingerprint(snapshot, config, today)?;
        self.sync_keyed(fingerprint, snapshot, config, today)
    }

    fn sync_store(
        &mut self,
        store: &BudgetStore,
        config: &TallyConfig,
        today: NaiveDate,
    ) -> Result<()> {
        let fingerprint = store_fingerprint(store, config, today)?;
        self.sync_keyed(fingerprint, store.state(), config, today)
    }

    /// Recompute panels if the fingerprint changed since the last call
    fn sync_keyed(
        &mut self,
        fingerprint: String,
        snapshot: &BudgetSnapshot,
        config: &TallyConfig,
        today: NaiveDate,
    ) -> Result<()> {
        if self.fingerprint.as_deref() == Some(fingerprint.as_str()) {
            return Ok(());
        }

        tracing::debug!(
            fingerprint = &fingerprint[..12],
            "Selector inputs changed, recomputing panels"
        );
        let panels = BudgetPanels::compute(
            snapshot.document.as_ref(),
            &snapshot.transactions,
            &config.taxonomy(),
        )?;

        self.views.clear();
        self.panels = panels;
        self.today = Some(today);
        self.fingerprint = Some(fingerprint);
        Ok(())
    }

    fn cached_view(&mut self, scope: &Scope, config: &TallyConfig) -> Option<ScopeView> {
        let key = scope.key();
        if let Some(view) = self.views.get(&key) {
            self.hits += 1;
            return Some(view.clone());
        }

        let panels = self.panels.as_ref()?;
        let panel = panels.scope(scope)?;
        let today = self.today?;
        self.misses += 1;

        let view = ScopeView::compute(
            scope,
            scope_label(scope, &config.taxonomy()),
            panel,
            &panels.period,
            today,
            &config.insights,
        );
        self.views.insert(key, view.clone());
        Some(view)
    }

    /// Panels for the snapshot, `None` when no document is loaded
    pub fn panels(
        &mut self,
        snapshot: &BudgetSnapshot,
        config: &TallyConfig,
        today: NaiveDate,
    ) -> Result<Option<BudgetPanels>> {
        self.sync(snapshot, config, today)?;
        Ok(self.panels.clone())
    }

    /// View for one scope, `None` when not loaded or the scope is unknown
    pub fn scope_view(
        &mut self,
        snapshot: &BudgetSnapshot,
        config: &TallyConfig,
        today: NaiveDate,
        scope: &Scope,
    ) -> Result<Option<ScopeView>> {
        self.sync(snapshot, config, today)?;
        Ok(self.cached_view(scope, config))
    }

    /// Panels for a store, keyed by its revision
    pub fn store_panels(
        &mut self,
        store: &BudgetStore,
        config: &TallyConfig,
        today: NaiveDate,
    ) -> Result<Option<BudgetPanels>> {
        self.sync_store(store, config, today)?;
        Ok(self.panels.clone())
    }

    /// View for one scope of a store, keyed by its revision
    pub fn store_view(
        &mut self,
        store: &BudgetStore,
        config: &TallyConfig,
        today: NaiveDate,
        scope: &Scope,
    ) -> Result<Option<ScopeView>> {
        self.sync_store(store, config, today)?;
        Ok(self.cached_view(scope, config))
    }

    pub fn fingerprint(&self) -> Option<&str> {
        self.fingerprint.as_deref()
    }

    /// Scope views served from cache
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Scope views computed
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop everything; the next call recomputes
    pub fn invalidate(&mut self) {
        self.fingerprint = None;
        self.today = None;
        self.panels = None;
        self.views.clear();
    }
}

/// All derived state for one snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub fingerprint: String,
    pub period: Period,
    pub today: NaiveDate,
    /// All three buckets combined
    pub total: BucketPanel,
    pub buckets: Vec<ScopeView>,
    pub categories: Vec<ScopeView>,
    pub bucket_health: HealthSummary,
    pub category_health: HealthSummary,
}

impl Dashboard {
    /// Returns `Ok(None)` when no document is loaded yet
    pub fn compute(
        snapshot: &BudgetSnapshot,
        config: &TallyConfig,
        today: NaiveDate,
        cache: &mut SelectorCache,
    ) -> Result<Option<Self>> {
        cache.sync(snapshot, config, today)?;
        Ok(Self::assemble(config, today, cache))
    }

    /// Same as `compute`, keyed by the store's revision
    pub fn from_store(
        store: &BudgetStore,
        config: &TallyConfig,
        today: NaiveDate,
        cache: &mut SelectorCache,
    ) -> Result<Option<Self>> {
        cache.sync_store(store, config, today)?;
        Ok(Self::assemble(config, today, cache))
    }

    fn assemble(config: &TallyConfig, today: NaiveDate, cache: &mut SelectorCache) -> Option<Self> {
        let (Some(panels), Some(fingerprint)) = (cache.panels.clone(), cache.fingerprint.clone())
        else {
            return None;
        };

        let buckets: Vec<ScopeView> = Bucket::all()
            .iter()
            .filter_map(|b| cache.cached_view(&Scope::Bucket(*b), config))
            .collect();

        let categories: Vec<ScopeView> = config
            .categories
            .iter()
            .filter_map(|c| cache.cached_view(&Scope::Category(c.id.clone()), config))
            .collect();

        let bucket_health =
            HealthSummary::from_scopes(buckets.iter().map(|v| (&v.scope, &v.insights)));
        let category_health =
            HealthSummary::from_scopes(categories.iter().map(|v| (&v.scope, &v.insights)));

        Some(Self {
            fingerprint,
            period: panels.period,
            today,
            total: panels.total(),
            buckets,
            categories,
            bucket_health,
            category_health,
        })
    }

    pub fn view(&self, scope: &Scope) -> Option<&ScopeView> {
        self.buckets
            .iter()
            .chain(self.categories.iter())
            .find(|v| &v.scope == scope)
    }
}
