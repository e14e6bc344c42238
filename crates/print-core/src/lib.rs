//! Core checkout engine for the print-order storefront.
//!
//! This module ties the selection store and the wizard controller into a
//! [`CheckoutSession`], the object a presentation layer drives for one
//! customer. Sessions are independent values; several can coexist. The
//! session answers price queries by recomputing them from its photos and
//! hands the finished order to a submission backend at the last step.

use print_config::{Config, ShippingConfig};
use print_submission::{SubmissionError, SubmissionService};
use print_types::{
	current_timestamp, Country, OrderReceipt, OrderState, OrderSummary, Photo, PhotoAsset, PhotoId, PlacedOrder,
	PrintSizeCatalog, ShippingDetails, ShippingField, ShippingParseError, SizeId, SizeSelection,
	WizardStep,
};
use thiserror::Error;
use uuid::Uuid;

pub mod builder;
pub mod pricing;
pub mod selection;
pub mod state;

pub use builder::{BuilderError, Checkout, CheckoutBuilder};
pub use pricing::PricingError;
pub use selection::{SelectionError, SelectionStore, ToggleOutcome};
pub use state::WizardController;

/// Errors that can occur while checking out.
#[derive(Debug, Error)]
pub enum CheckoutError {
	#[error(transparent)]
	Selection(#[from] SelectionError),
	#[error(transparent)]
	Pricing(#[from] PricingError),
	#[error(transparent)]
	Submission(#[from] SubmissionError),
	/// Orders can only be placed from the shipping step.
	#[error("Orders are placed from the {last} step, not {0}", last = WizardStep::LAST)]
	NotAtFinalStep(WizardStep),
	#[error("The order has no prints")]
	EmptyOrder,
	#[error("Missing shipping details: {}", field_list(.0))]
	IncompleteShipping(Vec<ShippingField>),
	#[error("The shop does not ship to {0}")]
	UnsupportedCountry(Country),
	#[error("Order {0} has already been placed")]
	AlreadyPlaced(String),
}

fn field_list(fields: &[ShippingField]) -> String {
	fields
		.iter()
		.map(|field| field.label())
		.collect::<Vec<_>>()
		.join(", ")
}

/// One customer's pass through the checkout wizard.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
	shop_name: String,
	currency: String,
	shipping_policy: ShippingConfig,
	/// False until the intro screen is dismissed.
	started: bool,
	store: SelectionStore,
	wizard: WizardController,
	shipping: ShippingDetails,
	receipt: Option<OrderReceipt>,
}

impl CheckoutSession {
	/// Creates a session priced by the catalog and tax rate in `config`.
	pub fn new(config: &Config) -> Self {
		Self {
			shop_name: config.shop.name.clone(),
			currency: config.shop.currency.clone(),
			shipping_policy: config.shipping.clone(),
			started: false,
			store: SelectionStore::new(config.catalog().clone(), config.pricing.tax_rate),
			wizard: WizardController::new(),
			shipping: ShippingDetails::default(),
			receipt: None,
		}
	}

	pub fn shop_name(&self) -> &str {
		&self.shop_name
	}

	/// Currency symbol amounts are displayed with.
	pub fn currency(&self) -> &str {
		&self.currency
	}

	pub fn is_started(&self) -> bool {
		self.started
	}

	/// Dismisses the intro screen and opens an empty order.
	///
	/// Anything recorded before the session started is discarded: photos,
	/// wizard position and shipping details. Returns false if the session was
	/// already started; its order is kept.
	pub fn start(&mut self) -> bool {
		if self.started {
			return false;
		}
		self.started = true;
		self.store = SelectionStore::new(self.store.catalog().clone(), self.store.tax_rate());
		self.wizard = WizardController::new();
		self.shipping = ShippingDetails::default();
		tracing::info!(shop = %self.shop_name, "Checkout session started");
		true
	}

	pub fn catalog(&self) -> &PrintSizeCatalog {
		self.store.catalog()
	}

	pub fn store(&self) -> &SelectionStore {
		&self.store
	}

	pub fn wizard(&self) -> &WizardController {
		&self.wizard
	}

	pub fn current_step(&self) -> WizardStep {
		self.wizard.current()
	}

	pub fn add_photo(&mut self) -> PhotoId {
		self.store.add_photo()
	}

	pub fn add_photo_with(&mut self, asset: PhotoAsset) -> PhotoId {
		self.store.add_photo_with(asset)
	}

	pub fn toggle_size(
		&mut self,
		photo_id: PhotoId,
		size_id: &SizeId,
	) -> Result<ToggleOutcome, SelectionError> {
		self.store.toggle_size(photo_id, size_id)
	}

	pub fn adjust_quantity(&mut self, photo_id: PhotoId, size_id: &SizeId, delta: i64) -> Option<u32> {
		self.store.adjust_quantity(photo_id, size_id, delta)
	}

	pub fn advance(&mut self) -> bool {
		self.wizard.advance()
	}

	pub fn retreat(&mut self) -> bool {
		self.wizard.retreat()
	}

	pub fn photos(&self) -> &[Photo] {
		self.store.photos()
	}

	pub fn photo(&self, photo_id: PhotoId) -> Option<&Photo> {
		self.store.photo(photo_id)
	}

	pub fn selection(&self, photo_id: PhotoId, size_id: &SizeId) -> Option<&SizeSelection> {
		self.store.selection(photo_id, size_id)
	}

	/// Copy of the order as it stands.
	pub fn snapshot(&self) -> OrderState {
		self.store.snapshot(self.wizard.current())
	}

	/// Price figures and review lines for the current order.
	pub fn summary(&self) -> Result<OrderSummary, PricingError> {
		pricing::summarize(&self.snapshot(), self.store.catalog(), self.store.tax_rate())
	}

	pub fn shipping(&self) -> &ShippingDetails {
		&self.shipping
	}

	/// Countries the shipping form offers.
	pub fn shipping_countries(&self) -> &[Country] {
		&self.shipping_policy.countries
	}

	/// Updates one shipping field.
	///
	/// Only the country can fail to parse; completeness is checked when the
	/// order is placed.
	pub fn set_shipping(&mut self, field: ShippingField, value: &str) -> Result<(), ShippingParseError> {
		self.shipping.set(field, value)?;
		tracing::debug!(field = field.key(), "Shipping detail updated");
		Ok(())
	}

	/// Receipt of the placed order, once there is one.
	pub fn receipt(&self) -> Option<&OrderReceipt> {
		self.receipt.as_ref()
	}

	/// Hands the order to `submission` and records the receipt.
	///
	/// Requires the shipping step, at least one print and complete shipping
	/// details for a country the shop ships to. The wizard stays on the
	/// shipping step afterwards.
	pub async fn place_order(
		&mut self,
		submission: &SubmissionService,
	) -> Result<OrderReceipt, CheckoutError> {
		let order = self.prepare_order()?;

		let receipt = submission.submit(&order).await?;
		tracing::info!(
			order_id = %receipt.order_id,
			prints = order.summary.print_count,
			total = %order.summary.total,
			"Order placed"
		);
		self.receipt = Some(receipt.clone());
		Ok(receipt)
	}

	fn prepare_order(&self) -> Result<PlacedOrder, CheckoutError> {
		if let Some(receipt) = &self.receipt {
			return Err(CheckoutError::AlreadyPlaced(receipt.order_id.clone()));
		}
		let step = self.wizard.current();
		if !step.is_last() {
			return Err(CheckoutError::NotAtFinalStep(step));
		}

		let summary = self.summary()?;
		if summary.print_count == 0 {
			return Err(CheckoutError::EmptyOrder);
		}

		let missing = self.shipping.missing_fields();
		if !missing.is_empty() {
			return Err(CheckoutError::IncompleteShipping(missing));
		}
		if let Some(country) = self.shipping.country {
			if !self.shipping_policy.ships_to(country) {
				return Err(CheckoutError::UnsupportedCountry(country));
			}
		}

		Ok(PlacedOrder {
			id: Uuid::new_v4().to_string(),
			placed_at: current_timestamp(),
			photos: self
				.store
				.photos()
				.iter()
				.filter(|photo| photo.has_selections())
				.cloned()
				.collect(),
			summary,
			shipping: self.shipping.clone(),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use print_config::ConfigBuilder;
	use print_submission::implementations::memory::{MemorySubmission, SubmittedOrders};
	use print_types::PrintSize;
	use rust_decimal::Decimal;

	fn config() -> Config {
		ConfigBuilder::new()
			.sizes(vec![
				PrintSize::new("4x6", "10 x 15 inches", Decimal::new(99, 2)),
				PrintSize::new("5x7", "15 x 20 inches", Decimal::new(199, 2)),
			])
			.countries(vec![Country::Canada, Country::UnitedStates])
			.build()
			.unwrap()
	}

	fn fill_shipping(session: &mut CheckoutSession, country: &str) {
		session.set_shipping(ShippingField::FirstName, "Ada").unwrap();
		session.set_shipping(ShippingField::LastName, "Lovelace").unwrap();
		session
			.set_shipping(ShippingField::AddressLine1, "12 Queen St")
			.unwrap();
		session.set_shipping(ShippingField::City, "Toronto").unwrap();
		session.set_shipping(ShippingField::PostalCode, "M5H 2N2").unwrap();
		session.set_shipping(ShippingField::Country, country).unwrap();
	}

	/// A started session at the shipping step with one 4x6 print.
	fn ready_session() -> CheckoutSession {
		let mut session = CheckoutSession::new(&config());
		session.start();
		let id = session.add_photo();
		session.toggle_size(id, &SizeId::from("4x6")).unwrap();
		for _ in 0..3 {
			session.advance();
		}
		session
	}

	fn memory_service() -> (SubmissionService, SubmittedOrders) {
		let backend = MemorySubmission::new();
		let orders = backend.orders();
		(SubmissionService::new("memory", Box::new(backend)), orders)
	}

	#[test]
	fn test_start_opens_empty_order() {
		let mut session = CheckoutSession::new(&config());
		assert!(!session.is_started());

		assert!(session.start());
		assert!(session.is_started());
		assert!(session.photos().is_empty());
		assert_eq!(session.current_step(), WizardStep::SelectPhotos);

		session.add_photo();
		assert!(!session.start());
		assert_eq!(session.photos().len(), 1);
	}

	#[test]
	fn test_start_discards_earlier_input() {
		let mut session = CheckoutSession::new(&config());
		session.add_photo();
		session.advance();
		session.set_shipping(ShippingField::City, "Toronto").unwrap();
		session.set_shipping(ShippingField::Country, "CA").unwrap();

		assert!(session.start());
		assert!(session.photos().is_empty());
		assert_eq!(session.current_step(), WizardStep::SelectPhotos);
		assert_eq!(session.shipping(), &ShippingDetails::default());
	}

	#[test]
	fn test_sessions_are_independent() {
		let config = config();
		let mut first = CheckoutSession::new(&config);
		let second = CheckoutSession::new(&config);

		first.add_photo();
		first.advance();

		assert!(second.photos().is_empty());
		assert_eq!(second.current_step(), WizardStep::SelectPhotos);
	}

	#[test]
	fn test_summary_reflects_selections() {
		let mut session = CheckoutSession::new(&config());
		let id = session.add_photo();
		session.toggle_size(id, &SizeId::from("4x6")).unwrap();

		let summary = session.summary().unwrap();
		assert_eq!(summary.subtotal, Decimal::new(99, 2));
		assert_eq!(summary.tax, Decimal::new(1287, 4));
		assert_eq!(summary.total, Decimal::new(112, 2));
		assert_eq!(summary.lines.len(), 1);

		session.toggle_size(id, &SizeId::from("4x6")).unwrap();
		let summary = session.summary().unwrap();
		assert_eq!(summary.subtotal, Decimal::ZERO);
		assert!(summary.lines.is_empty());
	}

	#[test]
	fn test_snapshot_tracks_step() {
		let mut session = CheckoutSession::new(&config());
		session.add_photo();
		session.advance();

		let snapshot = session.snapshot();
		assert_eq!(snapshot.current_step, WizardStep::ChooseSizes);
		assert_eq!(snapshot.photos.len(), 1);
	}

	#[tokio::test]
	async fn test_place_order() {
		let mut session = ready_session();
		fill_shipping(&mut session, "CA");
		let (service, orders) = memory_service();

		let before = current_timestamp();
		let receipt = session.place_order(&service).await.unwrap();

		assert_eq!(receipt.total, Decimal::new(112, 2));
		assert!(receipt.accepted_at >= before);
		assert_eq!(session.receipt(), Some(&receipt));
		assert_eq!(session.current_step(), WizardStep::Shipping);

		let orders = orders.read().await;
		assert_eq!(orders.len(), 1);
		assert_eq!(orders[0].id, receipt.order_id);
		assert_eq!(orders[0].shipping.city, "Toronto");
		assert_eq!(orders[0].photos.len(), 1);
		assert!(orders[0].placed_at >= before);
		assert!(orders[0].placed_at <= receipt.accepted_at);
	}

	#[tokio::test]
	async fn test_place_order_twice_rejected() {
		let mut session = ready_session();
		fill_shipping(&mut session, "CA");
		let (service, _) = memory_service();

		let receipt = session.place_order(&service).await.unwrap();
		let err = session.place_order(&service).await.unwrap_err();
		assert!(matches!(err, CheckoutError::AlreadyPlaced(id) if id == receipt.order_id));
	}

	#[tokio::test]
	async fn test_place_order_requires_shipping_step() {
		let mut session = ready_session();
		fill_shipping(&mut session, "CA");
		session.retreat();
		let (service, orders) = memory_service();

		let err = session.place_order(&service).await.unwrap_err();
		assert!(matches!(err, CheckoutError::NotAtFinalStep(WizardStep::ReviewOrder)));
		assert!(orders.read().await.is_empty());
	}

	#[tokio::test]
	async fn test_place_order_requires_prints() {
		let mut session = CheckoutSession::new(&config());
		session.start();
		session.add_photo();
		for _ in 0..3 {
			session.advance();
		}
		fill_shipping(&mut session, "CA");
		let (service, _) = memory_service();

		let err = session.place_order(&service).await.unwrap_err();
		assert!(matches!(err, CheckoutError::EmptyOrder));
	}

	#[tokio::test]
	async fn test_place_order_requires_complete_shipping() {
		let mut session = ready_session();
		session.set_shipping(ShippingField::FirstName, "Ada").unwrap();
		session.set_shipping(ShippingField::City, "   ").unwrap();
		let (service, _) = memory_service();

		let err = session.place_order(&service).await.unwrap_err();
		match err {
			CheckoutError::IncompleteShipping(missing) => {
				assert_eq!(missing.len(), 5);
				assert!(!missing.contains(&ShippingField::FirstName));
			},
			other => panic!("unexpected error: {other}"),
		}
		assert!(session.receipt().is_none());
	}

	#[tokio::test]
	async fn test_place_order_checks_country() {
		let mut session = ready_session();
		fill_shipping(&mut session, "FR");
		let (service, _) = memory_service();

		let err = session.place_order(&service).await.unwrap_err();
		assert!(matches!(err, CheckoutError::UnsupportedCountry(Country::France)));
	}

	#[tokio::test]
	async fn test_backend_rejection_leaves_no_receipt() {
		let mut session = ready_session();
		fill_shipping(&mut session, "US");
		let service = SubmissionService::new("memory", Box::new(MemorySubmission::with_capacity(0)));

		let err = session.place_order(&service).await.unwrap_err();
		assert!(matches!(
			err,
			CheckoutError::Submission(SubmissionError::Rejected(_))
		));
		assert!(session.receipt().is_none());
	}

	#[test]
	fn test_error_messages() {
		let err = CheckoutError::IncompleteShipping(vec![ShippingField::City, ShippingField::Country]);
		assert_eq!(err.to_string(), "Missing shipping details: City, Country");

		let err = CheckoutError::NotAtFinalStep(WizardStep::ChooseSizes);
		assert_eq!(
			err.to_string(),
			"Orders are placed from the Shipping step, not Choose Sizes"
		);
	}
}
