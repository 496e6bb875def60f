//! Typed CRUD store over a key-value backend.
//!
//! Each entity type lives in its own table, serialized as one JSON blob
//! under a namespaced key; every mutating operation is a full
//! read-transform-write of a single table blob. Records are kept in
//! insertion order and scoped to their owning user. There is no cross-table
//! atomicity: two related writes are two independent operations.

use std::collections::HashMap;

use entities::{
    Customer, CustomerUpdate, Invoice, InvoiceDraft, InvoiceUpdate, Product, ProductUpdate, Quote,
    QuoteDraft, QuoteStatus, QuoteUpdate, Service, ServiceUpdate, User, UserUpdate,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    numbering::{counter_slot, current_year, format_number},
    DocumentKind, KeyValueBackend, StoreError, StoreResult,
};

/// Default key namespace for persisted tables.
pub const DEFAULT_NAMESPACE: &str = "billing";

const TABLE_USERS: &str = "users";
const TABLE_PRODUCTS: &str = "products";
const TABLE_SERVICES: &str = "services";
const TABLE_CUSTOMERS: &str = "customers";
const TABLE_QUOTES: &str = "quotes";
const TABLE_INVOICES: &str = "invoices";
const TABLE_COUNTERS: &str = "counters";
const KEY_SESSION: &str = "session";

/// A record persisted in one of the keyed tables.
trait TableRecord: Clone + Serialize + DeserializeOwned + Send {
    const TABLE: &'static str;
    const ENTITY: &'static str;

    fn record_id(&self) -> Uuid;
    fn record_owner(&self) -> Uuid;
}

impl TableRecord for User {
    const TABLE: &'static str = TABLE_USERS;
    const ENTITY: &'static str = "User";

    fn record_id(&self) -> Uuid {
        self.id
    }

    // A user owns itself; scoped listing is unused for this table.
    fn record_owner(&self) -> Uuid {
        self.id
    }
}

impl TableRecord for Product {
    const TABLE: &'static str = TABLE_PRODUCTS;
    const ENTITY: &'static str = "Product";

    fn record_id(&self) -> Uuid {
        self.id
    }

    fn record_owner(&self) -> Uuid {
        self.user_id
    }
}

impl TableRecord for Service {
    const TABLE: &'static str = TABLE_SERVICES;
    const ENTITY: &'static str = "Service";

    fn record_id(&self) -> Uuid {
        self.id
    }

    fn record_owner(&self) -> Uuid {
        self.user_id
    }
}

impl TableRecord for Customer {
    const TABLE: &'static str = TABLE_CUSTOMERS;
    const ENTITY: &'static str = "Customer";

    fn record_id(&self) -> Uuid {
        self.id
    }

    fn record_owner(&self) -> Uuid {
        self.user_id
    }
}

impl TableRecord for Quote {
    const TABLE: &'static str = TABLE_QUOTES;
    const ENTITY: &'static str = "Quote";

    fn record_id(&self) -> Uuid {
        self.id
    }

    fn record_owner(&self) -> Uuid {
        self.user_id
    }
}

impl TableRecord for Invoice {
    const TABLE: &'static str = TABLE_INVOICES;
    const ENTITY: &'static str = "Invoice";

    fn record_id(&self) -> Uuid {
        self.id
    }

    fn record_owner(&self) -> Uuid {
        self.user_id
    }
}

/// The document store: typed CRUD, numbering and lifecycle over a
/// key-value backend.
#[derive(Debug, Clone)]
pub struct DocumentStore<B: KeyValueBackend> {
    backend: B,
    namespace: String,
}

impl<B: KeyValueBackend> DocumentStore<B> {
    /// Creates a store over `backend` with the default key namespace.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }

    /// Overrides the key namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    fn table_key(&self, table: &str) -> String {
        format!("{}_{table}", self.namespace)
    }

    // =========================================================================
    // Generic table plumbing
    // =========================================================================

    async fn load<T: TableRecord>(&self) -> StoreResult<Vec<T>> {
        match self.backend.read(&self.table_key(T::TABLE)).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn persist<T: TableRecord>(&self, rows: &[T]) -> StoreResult<()> {
        let raw = serde_json::to_string(rows)?;
        self.backend.write(&self.table_key(T::TABLE), &raw).await
    }

    async fn insert<T: TableRecord>(&self, record: T) -> StoreResult<T> {
        let mut rows: Vec<T> = self.load().await?;
        if rows.iter().any(|r| r.record_id() == record.record_id()) {
            return Err(StoreError::already_exists(T::ENTITY, record.record_id()));
        }
        rows.push(record.clone());
        self.persist(&rows).await?;
        debug!(entity = T::ENTITY, id = %record.record_id(), "created record");
        Ok(record)
    }

    async fn find<T: TableRecord>(&self, id: Uuid) -> StoreResult<Option<T>> {
        let rows: Vec<T> = self.load().await?;
        Ok(rows.into_iter().find(|r| r.record_id() == id))
    }

    async fn list_owned<T: TableRecord>(&self, user_id: Uuid) -> StoreResult<Vec<T>> {
        let rows: Vec<T> = self.load().await?;
        Ok(rows
            .into_iter()
            .filter(|r| r.record_owner() == user_id)
            .collect())
    }

    /// Applies `mutate` to the record with `id`, persisting on success.
    /// `Ok(None)` when the record does not exist.
    async fn modify<T, F>(&self, id: Uuid, mutate: F) -> StoreResult<Option<T>>
    where
        T: TableRecord,
        F: FnOnce(&mut T) -> StoreResult<()> + Send,
    {
        let mut rows: Vec<T> = self.load().await?;
        let Some(row) = rows.iter_mut().find(|r| r.record_id() == id) else {
            return Ok(None);
        };
        mutate(row)?;
        let updated = row.clone();
        self.persist(&rows).await?;
        debug!(entity = T::ENTITY, id = %id, "updated record");
        Ok(Some(updated))
    }

    async fn remove<T: TableRecord>(&self, id: Uuid) -> StoreResult<bool> {
        let mut rows: Vec<T> = self.load().await?;
        let before = rows.len();
        rows.retain(|r| r.record_id() != id);
        if rows.len() == before {
            return Ok(false);
        }
        self.persist(&rows).await?;
        debug!(entity = T::ENTITY, id = %id, "deleted record");
        Ok(true)
    }

    /// Looks up a customer that must exist and belong to `user_id` before a
    /// document can snapshot its name.
    async fn snapshot_customer(&self, user_id: Uuid, customer_id: Uuid) -> StoreResult<Customer> {
        match self.find::<Customer>(customer_id).await? {
            Some(customer) if customer.user_id == user_id => Ok(customer),
            _ => Err(StoreError::not_found("Customer", customer_id)),
        }
    }

    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user.
    pub async fn create_user(&self, user: User) -> StoreResult<User> {
        user.validate()?;
        self.insert(user).await
    }

    /// Gets a user by ID.
    pub async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        self.find(id).await
    }

    /// Gets a user by email.
    pub async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users: Vec<User> = self.load().await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    /// Updates a user. `Ok(None)` when the ID does not exist.
    pub async fn update_user(&self, id: Uuid, update: UserUpdate) -> StoreResult<Option<User>> {
        self.modify(id, |user: &mut User| {
            user.apply(update);
            user.validate().map_err(Into::into)
        })
        .await
    }

    // =========================================================================
    // Session pointer
    // =========================================================================

    /// Records `user_id` as the active session user.
    pub async fn set_current_user(&self, user_id: Uuid) -> StoreResult<()> {
        let raw = serde_json::to_string(&user_id)?;
        self.backend.write(&self.table_key(KEY_SESSION), &raw).await
    }

    /// Resolves the active session user, if one is recorded and still exists.
    pub async fn current_user(&self) -> StoreResult<Option<User>> {
        match self.backend.read(&self.table_key(KEY_SESSION)).await? {
            Some(raw) => {
                let user_id: Uuid = serde_json::from_str(&raw)?;
                self.find(user_id).await
            }
            None => Ok(None),
        }
    }

    /// Clears the active session pointer.
    pub async fn clear_current_user(&self) -> StoreResult<()> {
        self.backend.remove(&self.table_key(KEY_SESSION)).await
    }

    // =========================================================================
    // Product operations
    // =========================================================================

    /// Lists the user's products in insertion order.
    pub async fn list_products(&self, user_id: Uuid) -> StoreResult<Vec<Product>> {
        self.list_owned(user_id).await
    }

    /// Gets a product by ID.
    pub async fn get_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        self.find(id).await
    }

    /// Creates a new product.
    pub async fn create_product(&self, product: Product) -> StoreResult<Product> {
        product.validate()?;
        self.insert(product).await
    }

    /// Updates a product. `Ok(None)` when the ID does not exist.
    pub async fn update_product(
        &self,
        id: Uuid,
        update: ProductUpdate,
    ) -> StoreResult<Option<Product>> {
        self.modify(id, |product: &mut Product| {
            product.apply(update);
            product.validate().map_err(Into::into)
        })
        .await
    }

    /// Deletes a product. `Ok(false)` when the ID does not exist.
    pub async fn delete_product(&self, id: Uuid) -> StoreResult<bool> {
        self.remove::<Product>(id).await
    }

    // =========================================================================
    // Service operations
    // =========================================================================

    /// Lists the user's services in insertion order.
    pub async fn list_services(&self, user_id: Uuid) -> StoreResult<Vec<Service>> {
        self.list_owned(user_id).await
    }

    /// Gets a service by ID.
    pub async fn get_service(&self, id: Uuid) -> StoreResult<Option<Service>> {
        self.find(id).await
    }

    /// Creates a new service.
    pub async fn create_service(&self, service: Service) -> StoreResult<Service> {
        service.validate()?;
        self.insert(service).await
    }

    /// Updates a service. `Ok(None)` when the ID does not exist.
    pub async fn update_service(
        &self,
        id: Uuid,
        update: ServiceUpdate,
    ) -> StoreResult<Option<Service>> {
        self.modify(id, |service: &mut Service| {
            service.apply(update);
            service.validate().map_err(Into::into)
        })
        .await
    }

    /// Deletes a service. `Ok(false)` when the ID does not exist.
    pub async fn delete_service(&self, id: Uuid) -> StoreResult<bool> {
        self.remove::<Service>(id).await
    }

    // =========================================================================
    // Customer operations
    // =========================================================================

    /// Lists the user's customers in insertion order.
    pub async fn list_customers(&self, user_id: Uuid) -> StoreResult<Vec<Customer>> {
        self.list_owned(user_id).await
    }

    /// Gets a customer by ID.
    pub async fn get_customer(&self, id: Uuid) -> StoreResult<Option<Customer>> {
        self.find(id).await
    }

    /// Creates a new customer.
    pub async fn create_customer(&self, customer: Customer) -> StoreResult<Customer> {
        customer.validate()?;
        self.insert(customer).await
    }

    /// Updates a customer. `Ok(None)` when the ID does not exist.
    pub async fn update_customer(
        &self,
        id: Uuid,
        update: CustomerUpdate,
    ) -> StoreResult<Option<Customer>> {
        self.modify(id, |customer: &mut Customer| {
            customer.apply(update);
            customer.validate().map_err(Into::into)
        })
        .await
    }

    /// Deletes a customer. `Ok(false)` when the ID does not exist.
    ///
    /// Documents already addressed to the customer keep their name snapshot
    /// and dangling `customer_id`; callers tolerate that by design.
    pub async fn delete_customer(&self, id: Uuid) -> StoreResult<bool> {
        self.remove::<Customer>(id).await
    }

    // =========================================================================
    // Quote operations
    // =========================================================================

    /// Lists the user's quotes in insertion order.
    pub async fn list_quotes(&self, user_id: Uuid) -> StoreResult<Vec<Quote>> {
        self.list_owned(user_id).await
    }

    /// Gets a quote by ID.
    pub async fn get_quote(&self, id: Uuid) -> StoreResult<Option<Quote>> {
        self.find(id).await
    }

    /// Creates a quote from a draft: snapshots the customer name, assigns
    /// the next quote number and derives the totals from the draft's items.
    pub async fn create_quote(&self, user_id: Uuid, draft: QuoteDraft) -> StoreResult<Quote> {
        let customer = self.snapshot_customer(user_id, draft.customer_id).await?;
        let number = self.next_number(user_id, DocumentKind::Quote).await?;
        let quote = Quote::from_draft(user_id, customer.name, number, draft);
        self.insert(quote).await
    }

    /// Updates a quote. `Ok(None)` when the ID does not exist. Totals are
    /// recomputed from the resulting items regardless of what the update
    /// carries.
    pub async fn update_quote(&self, id: Uuid, update: QuoteUpdate) -> StoreResult<Option<Quote>> {
        self.modify(id, |quote: &mut Quote| {
            quote.apply(update);
            Ok(())
        })
        .await
    }

    /// Deletes a quote. `Ok(false)` when the ID does not exist. Invoices
    /// converted from the quote keep their `quote_id` back-reference.
    pub async fn delete_quote(&self, id: Uuid) -> StoreResult<bool> {
        self.remove::<Quote>(id).await
    }

    // =========================================================================
    // Invoice operations
    // =========================================================================

    /// Lists the user's invoices in insertion order.
    pub async fn list_invoices(&self, user_id: Uuid) -> StoreResult<Vec<Invoice>> {
        self.list_owned(user_id).await
    }

    /// Gets an invoice by ID.
    pub async fn get_invoice(&self, id: Uuid) -> StoreResult<Option<Invoice>> {
        self.find(id).await
    }

    /// Creates an invoice directly from a draft, without a source quote.
    pub async fn create_invoice(&self, user_id: Uuid, draft: InvoiceDraft) -> StoreResult<Invoice> {
        let customer = self.snapshot_customer(user_id, draft.customer_id).await?;
        let number = self.next_number(user_id, DocumentKind::Invoice).await?;
        let invoice = Invoice::from_draft(user_id, customer.name, number, draft);
        self.insert(invoice).await
    }

    /// Updates an invoice. `Ok(None)` when the ID does not exist.
    pub async fn update_invoice(
        &self,
        id: Uuid,
        update: InvoiceUpdate,
    ) -> StoreResult<Option<Invoice>> {
        self.modify(id, |invoice: &mut Invoice| {
            invoice.apply(update);
            Ok(())
        })
        .await
    }

    /// Deletes an invoice. `Ok(false)` when the ID does not exist.
    pub async fn delete_invoice(&self, id: Uuid) -> StoreResult<bool> {
        self.remove::<Invoice>(id).await
    }

    // =========================================================================
    // Document numbering
    // =========================================================================

    /// Issues the next quote number for `user_id`. Consumes a counter value.
    pub async fn generate_quote_number(&self, user_id: Uuid) -> StoreResult<String> {
        self.next_number(user_id, DocumentKind::Quote).await
    }

    /// Issues the next invoice number for `user_id`. Consumes a counter
    /// value.
    pub async fn generate_invoice_number(&self, user_id: Uuid) -> StoreResult<String> {
        self.next_number(user_id, DocumentKind::Invoice).await
    }

    async fn next_number(&self, user_id: Uuid, kind: DocumentKind) -> StoreResult<String> {
        let key = self.table_key(TABLE_COUNTERS);
        let mut counters: HashMap<String, u32> = match self.backend.read(&key).await? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => HashMap::new(),
        };
        let year = current_year();
        let slot = counter_slot(user_id, kind, year);
        let next = counters.get(&slot).copied().unwrap_or(0) + 1;
        counters.insert(slot, next);
        self.backend
            .write(&key, &serde_json::to_string(&counters)?)
            .await?;
        Ok(format_number(kind, year, next))
    }

    // =========================================================================
    // Conversion
    // =========================================================================

    /// Converts an accepted quote into a new invoice.
    ///
    /// The invoice copies the quote's customer, items and totals verbatim,
    /// carries a permanent `quote_id` back-reference and falls due thirty
    /// days from conversion. The source quote is left unmodified, so an
    /// accepted quote can be converted again unless calling code prevents
    /// it.
    pub async fn convert_quote_to_invoice(&self, quote_id: Uuid) -> StoreResult<Invoice> {
        let quote = self
            .find::<Quote>(quote_id)
            .await?
            .ok_or_else(|| StoreError::not_found("Quote", quote_id))?;
        if quote.status != QuoteStatus::Accepted {
            warn!(quote_id = %quote_id, status = %quote.status, "conversion requires an accepted quote");
            return Err(StoreError::invalid_state("accepted", quote.status));
        }
        let number = self.next_number(quote.user_id, DocumentKind::Invoice).await?;
        let invoice = Invoice::from_quote(&quote, number);
        self.insert(invoice).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use entities::{InvoiceStatus, LineItem};

    use super::*;
    use crate::{FileBackend, MemoryBackend};

    fn store() -> DocumentStore<MemoryBackend> {
        DocumentStore::new(MemoryBackend::new())
    }

    async fn seeded_customer(store: &DocumentStore<MemoryBackend>, user_id: Uuid) -> Customer {
        store
            .create_customer(Customer::new(user_id, "Globex Corp"))
            .await
            .unwrap()
    }

    async fn draft_quote(
        store: &DocumentStore<MemoryBackend>,
        user_id: Uuid,
        customer_id: Uuid,
    ) -> Quote {
        let product = store
            .create_product(Product::new(user_id, "Widget", 100.0, 10.0))
            .await
            .unwrap();
        let service = store
            .create_service(Service::new(user_id, "Install", 50.0, 20.0))
            .await
            .unwrap();
        let items = vec![
            LineItem::from_product(&product, 1.0).unwrap(),
            LineItem::from_service(&service, 1.0).unwrap(),
        ];
        let draft = QuoteDraft::new(customer_id, Utc::now() + Duration::days(14))
            .with_items(items)
            .with_payment_terms("Net 30");
        store.create_quote(user_id, draft).await.unwrap()
    }

    #[tokio::test]
    async fn test_product_crud_is_scoped_per_user() {
        let store = store();
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();

        let product = store
            .create_product(Product::new(user_a, "Widget", 10.0, 21.0))
            .await
            .unwrap();
        store
            .create_product(Product::new(user_b, "Other widget", 12.0, 21.0))
            .await
            .unwrap();

        let listed = store.list_products(user_a).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, product.id);

        let fetched = store.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Widget");
    }

    #[tokio::test]
    async fn test_update_merges_only_provided_fields() {
        let store = store();
        let user_id = Uuid::new_v4();
        let product = store
            .create_product(
                Product::new(user_id, "Widget", 10.0, 21.0).with_description("Standard widget"),
            )
            .await
            .unwrap();

        let updated = store
            .update_product(
                product.id,
                ProductUpdate {
                    price: Some(12.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.price, 12.5);
        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.description, Some("Standard widget".to_string()));
        assert_eq!(updated.created_at, product.created_at);
    }

    #[tokio::test]
    async fn test_update_missing_id_returns_none() {
        let store = store();
        let missing = store
            .update_product(Uuid::new_v4(), ProductUpdate::default())
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = store();
        let user_id = Uuid::new_v4();
        let product = store
            .create_product(Product::new(user_id, "Widget", 10.0, 21.0))
            .await
            .unwrap();

        assert!(store.delete_product(product.id).await.unwrap());
        assert!(!store.delete_product(product.id).await.unwrap());
        assert!(store.list_products(user_id).await.unwrap().is_empty());

        // Deleting an ID that never existed reports false as well.
        assert!(!store.delete_product(Uuid::new_v4()).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_numbers() {
        let store = store();
        let user_id = Uuid::new_v4();

        let negative = store
            .create_product(Product::new(user_id, "Widget", -1.0, 21.0))
            .await;
        assert!(matches!(negative, Err(StoreError::Validation(_))));

        let bad_rate = store
            .create_service(Service::new(user_id, "Install", 50.0, 130.0))
            .await;
        assert!(matches!(bad_rate, Err(StoreError::Validation(_))));

        assert!(store.list_products(user_id).await.unwrap().is_empty());
        assert!(store.list_services(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_and_session_pointer() {
        let store = store();
        let user = store
            .create_user(User::new("owner@example.com", "Acme Ltd"))
            .await
            .unwrap();

        assert!(store.current_user().await.unwrap().is_none());

        store.set_current_user(user.id).await.unwrap();
        let active = store.current_user().await.unwrap().unwrap();
        assert_eq!(active.id, user.id);

        let by_email = store
            .get_user_by_email("owner@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_email.id, user.id);

        store.clear_current_user().await.unwrap();
        assert!(store.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_quote_creation_snapshots_customer_and_derives_totals() {
        let store = store();
        let user_id = Uuid::new_v4();
        let customer = seeded_customer(&store, user_id).await;

        let quote = draft_quote(&store, user_id, customer.id).await;

        assert_eq!(quote.customer_name, "Globex Corp");
        assert_eq!(quote.subtotal, 150.0);
        assert_eq!(quote.tax_amount, 100.0 * 0.10 + 50.0 * 0.20);
        assert_eq!(quote.total, 170.0);
        assert_eq!(quote.status, QuoteStatus::Draft);

        // Renaming the customer afterwards does not touch the snapshot.
        store
            .update_customer(
                customer.id,
                CustomerUpdate {
                    name: Some("Globex International".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let reloaded = store.get_quote(quote.id).await.unwrap().unwrap();
        assert_eq!(reloaded.customer_name, "Globex Corp");
    }

    #[tokio::test]
    async fn test_quote_creation_requires_owned_customer() {
        let store = store();
        let user_id = Uuid::new_v4();
        let foreign_customer = seeded_customer(&store, Uuid::new_v4()).await;

        let unknown = store
            .create_quote(
                user_id,
                QuoteDraft::new(Uuid::new_v4(), Utc::now() + Duration::days(14)),
            )
            .await;
        assert!(matches!(unknown, Err(StoreError::NotFound { .. })));

        let cross_user = store
            .create_quote(
                user_id,
                QuoteDraft::new(foreign_customer.id, Utc::now() + Duration::days(14)),
            )
            .await;
        assert!(matches!(cross_user, Err(StoreError::NotFound { .. })));

        assert!(store.list_quotes(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_numbering_sequence_and_independent_counters() {
        let store = store();
        let user_id = Uuid::new_v4();
        let customer = seeded_customer(&store, user_id).await;
        let year = Utc::now().format("%Y");

        let first = draft_quote(&store, user_id, customer.id).await;
        let second = draft_quote(&store, user_id, customer.id).await;
        assert_eq!(first.quote_number, format!("Q{year}-0001"));
        assert_eq!(second.quote_number, format!("Q{year}-0002"));

        let invoice = store
            .create_invoice(
                user_id,
                InvoiceDraft::new(customer.id, Utc::now() + Duration::days(30)),
            )
            .await
            .unwrap();
        assert_eq!(invoice.invoice_number, format!("INV{year}-0001"));
    }

    #[tokio::test]
    async fn test_numbering_is_scoped_per_user() {
        let store = store();
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();
        let year = Utc::now().format("%Y");

        assert_eq!(
            store.generate_quote_number(user_a).await.unwrap(),
            format!("Q{year}-0001")
        );
        assert_eq!(
            store.generate_quote_number(user_b).await.unwrap(),
            format!("Q{year}-0001")
        );
        assert_eq!(
            store.generate_quote_number(user_a).await.unwrap(),
            format!("Q{year}-0002")
        );
    }

    #[tokio::test]
    async fn test_numbers_are_not_reused_after_delete() {
        let store = store();
        let user_id = Uuid::new_v4();
        let customer = seeded_customer(&store, user_id).await;
        let year = Utc::now().format("%Y");

        let first = draft_quote(&store, user_id, customer.id).await;
        assert!(store.delete_quote(first.id).await.unwrap());

        let second = draft_quote(&store, user_id, customer.id).await;
        assert_eq!(second.quote_number, format!("Q{year}-0002"));
    }

    #[tokio::test]
    async fn test_conversion_requires_accepted_status() {
        let store = store();
        let user_id = Uuid::new_v4();
        let customer = seeded_customer(&store, user_id).await;
        let quote = draft_quote(&store, user_id, customer.id).await;

        for status in [QuoteStatus::Draft, QuoteStatus::Sent, QuoteStatus::Rejected] {
            store
                .update_quote(
                    quote.id,
                    QuoteUpdate {
                        status: Some(status),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            let outcome = store.convert_quote_to_invoice(quote.id).await;
            assert!(matches!(outcome, Err(StoreError::InvalidState { .. })));
        }

        assert!(store.list_invoices(user_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_conversion_copies_the_quote_verbatim() {
        let store = store();
        let user_id = Uuid::new_v4();
        let customer = seeded_customer(&store, user_id).await;
        let quote = draft_quote(&store, user_id, customer.id).await;
        store
            .update_quote(
                quote.id,
                QuoteUpdate {
                    status: Some(QuoteStatus::Accepted),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let invoice = store.convert_quote_to_invoice(quote.id).await.unwrap();
        let quote = store.get_quote(quote.id).await.unwrap().unwrap();

        assert_eq!(invoice.quote_id, Some(quote.id));
        assert_eq!(invoice.customer_id, quote.customer_id);
        assert_eq!(invoice.customer_name, quote.customer_name);
        assert_eq!(invoice.subtotal, quote.subtotal);
        assert_eq!(invoice.tax_amount, quote.tax_amount);
        assert_eq!(invoice.total, quote.total);
        assert_eq!(invoice.items.len(), quote.items.len());
        assert_eq!(invoice.payment_terms, quote.payment_terms);
        assert_eq!(invoice.status, InvoiceStatus::Draft);
        assert_eq!((invoice.due_date - invoice.created_at).num_days(), 30);

        // The source quote is untouched and still accepted.
        assert_eq!(quote.status, QuoteStatus::Accepted);

        let invoices = store.list_invoices(user_id).await.unwrap();
        assert_eq!(invoices.len(), 1);
    }

    #[tokio::test]
    async fn test_accepted_quote_can_convert_repeatedly() {
        let store = store();
        let user_id = Uuid::new_v4();
        let customer = seeded_customer(&store, user_id).await;
        let quote = draft_quote(&store, user_id, customer.id).await;
        store
            .update_quote(
                quote.id,
                QuoteUpdate {
                    status: Some(QuoteStatus::Accepted),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let year = Utc::now().format("%Y");

        let first = store.convert_quote_to_invoice(quote.id).await.unwrap();
        let second = store.convert_quote_to_invoice(quote.id).await.unwrap();

        assert_eq!(first.invoice_number, format!("INV{year}-0001"));
        assert_eq!(second.invoice_number, format!("INV{year}-0002"));
        assert_eq!(store.list_invoices(user_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_conversion_of_missing_quote_fails() {
        let store = store();
        let outcome = store.convert_quote_to_invoice(Uuid::new_v4()).await;
        assert!(matches!(outcome, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_file_backend_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let user_id = Uuid::new_v4();

        let store = DocumentStore::new(FileBackend::new(dir.path()));
        let product = store
            .create_product(Product::new(user_id, "Widget", 10.0, 21.0))
            .await
            .unwrap();
        drop(store);

        let reopened = DocumentStore::new(FileBackend::new(dir.path()));
        let listed = reopened.list_products(user_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, product.id);
    }
}
