//! Purchase service - checkout and order management.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult, OptionExt};
use domain::{
    initial_state, is_known_state, normalize_lines, normalize_state, stock_deltas,
    validate_shipping_price, CartItem, NewPurchase, Purchase, PurchaseEdit, PurchaseItem,
    PurchaseOrder,
};

use crate::dao::{CartDao, ProductDao, PurchaseDao, UserDao, WriteOutcome};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Result of a state change request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateUpdate {
    Updated,
    /// The purchase already had the requested state
    Unchanged,
}

impl StateUpdate {
    pub fn message(self) -> &'static str {
        match self {
            StateUpdate::Updated => "Purchase state updated",
            StateUpdate::Unchanged => "Purchase already has that state",
        }
    }
}

/// Purchase service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PurchaseService: Send + Sync {
    async fn list_purchases(&self) -> AppResult<Vec<Purchase>>;

    async fn get_purchase(&self, purchase_id: i64) -> AppResult<Purchase>;

    /// Purchases placed by one user, newest first
    async fn purchase_history(&self, user_id: i64) -> AppResult<Vec<Purchase>>;

    /// Price the order against the catalogue and store it for the user
    async fn place_purchase(&self, user_id: i64, order: PurchaseOrder) -> AppResult<Purchase>;

    /// Apply field changes and return the updated purchase.
    ///
    /// New lines are priced against the catalogue and the stock difference is applied.
    async fn update_purchase(&self, purchase_id: i64, edit: PurchaseEdit)
        -> AppResult<Purchase>;

    /// Change the state of a purchase owned by `user_id`
    async fn update_state(
        &self,
        user_id: i64,
        purchase_id: i64,
        state: String,
    ) -> AppResult<StateUpdate>;

    /// Remove a purchase and put its units back in stock
    async fn delete_purchase(&self, purchase_id: i64) -> AppResult<()>;
}

/// Concrete purchase service.
pub struct PurchaseManager {
    purchases: Arc<dyn PurchaseDao>,
    products: Arc<dyn ProductDao>,
    users: Arc<dyn UserDao>,
    carts: Arc<dyn CartDao>,
}

impl PurchaseManager {
    pub fn new(
        purchases: Arc<dyn PurchaseDao>,
        products: Arc<dyn ProductDao>,
        users: Arc<dyn UserDao>,
        carts: Arc<dyn CartDao>,
    ) -> Self {
        Self {
            purchases,
            products,
            users,
            carts,
        }
    }

    /// Price `lines` at catalogue prices, checking stock.
    ///
    /// Units in `held` were already taken from stock for the same purchase and count
    /// as available.
    async fn price_lines(
        &self,
        lines: Vec<CartItem>,
        held: &[PurchaseItem],
    ) -> AppResult<Vec<PurchaseItem>> {
        let lines = normalize_lines(lines)?;
        if lines.is_empty() {
            return Err(AppError::validation(
                "A purchase needs at least one product",
            ));
        }

        let mut priced = Vec::with_capacity(lines.len());
        for line in lines {
            let mut product = self.products.get_object(&line.code).await?.ok_or_else(|| {
                AppError::validation(format!("Product {} does not exist", line.code))
            })?;
            product.quantity_available += held
                .iter()
                .filter(|item| item.code == line.code)
                .map(|item| item.quantity)
                .sum::<i64>();
            product.ensure_stock(line.quantity)?;

            priced.push(PurchaseItem {
                code: line.code,
                quantity: line.quantity,
                price: product.price,
            });
        }
        Ok(priced)
    }

    /// Take each delta out of stock; negative deltas are put back.
    ///
    /// On a shortfall the deltas already applied are undone.
    async fn take_stock(&self, deltas: &[(String, i64)]) -> AppResult<()> {
        for (applied, (code, units)) in deltas.iter().enumerate() {
            match self.products.adjust_stock(code, -units).await {
                Ok(WriteOutcome::Missing) if *units > 0 => {
                    self.return_stock(&deltas[..applied]).await;
                    return Err(AppError::validation(format!(
                        "Not enough stock for product {}",
                        code
                    )));
                }
                Ok(WriteOutcome::Missing) => {
                    tracing::warn!("Product {} is gone, {} units not returned", code, -units);
                }
                Ok(_) => {}
                Err(e) => {
                    self.return_stock(&deltas[..applied]).await;
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Undo `deltas` taken by [`Self::take_stock`]. Failures are logged.
    async fn return_stock(&self, deltas: &[(String, i64)]) {
        for (code, units) in deltas {
            if let Err(e) = self.products.adjust_stock(code, *units).await {
                tracing::error!("Could not restore stock of product {}: {}", code, e);
            }
        }
    }
}

#[async_trait]
impl PurchaseService for PurchaseManager {
    async fn list_purchases(&self) -> AppResult<Vec<Purchase>> {
        self.purchases.get_all().await
    }

    async fn get_purchase(&self, purchase_id: i64) -> AppResult<Purchase> {
        self.purchases
            .get_object(purchase_id)
            .await?
            .ok_or_not_found()
    }

    async fn purchase_history(&self, user_id: i64) -> AppResult<Vec<Purchase>> {
        self.purchases.get_by_user(user_id).await
    }

    async fn place_purchase(&self, user_id: i64, order: PurchaseOrder) -> AppResult<Purchase> {
        let state = initial_state(order.state.as_deref())?;
        validate_shipping_price(order.shipping_price)?;

        let shipping_address = order.shipping_address.trim().to_string();
        if shipping_address.is_empty() {
            return Err(AppError::validation("Shipping address cannot be empty"));
        }

        let requested = if order.from_cart {
            self.carts
                .get_object(user_id)
                .await?
                .map(|cart| cart.items)
                .unwrap_or_default()
        } else {
            order.products
        };

        let products = self.price_lines(requested, &[]).await?;
        let taken = stock_deltas(&[], &products);
        self.take_stock(&taken).await?;

        let created = self
            .purchases
            .create(NewPurchase {
                purchase_details: order.purchase_details,
                products,
                voucher_id: order.voucher_id,
                aprox_delivery_date: order.aprox_delivery_date,
                shipping_address,
                shipping_price: order.shipping_price,
                user_id,
                state,
            })
            .await;
        let purchase = match created {
            Ok(purchase) => purchase,
            Err(e) => {
                self.return_stock(&taken).await;
                return Err(e);
            }
        };

        self.users.add_purchase(user_id, purchase.purchase_id).await?;

        if order.from_cart {
            self.carts.delete(user_id).await?;
        }

        tracing::info!(
            "User {} placed purchase {} totalling {:.2}",
            user_id,
            purchase.purchase_id,
            purchase.total()
        );
        Ok(purchase)
    }

    async fn update_purchase(
        &self,
        purchase_id: i64,
        mut edit: PurchaseEdit,
    ) -> AppResult<Purchase> {
        if edit.is_empty() {
            return Err(AppError::validation("No purchase fields to update"));
        }
        edit.validate()?;

        let current = self.get_purchase(purchase_id).await?;

        let (products, deltas) = match edit.products.take() {
            Some(lines) => {
                let products = self.price_lines(lines, &current.products).await?;
                let deltas = stock_deltas(&current.products, &products);
                (Some(products), deltas)
            }
            None => (None, Vec::new()),
        };
        self.take_stock(&deltas).await?;

        match self
            .purchases
            .update(purchase_id, edit.into_changes(products))
            .await
        {
            Ok(WriteOutcome::Missing) => {
                self.return_stock(&deltas).await;
                return Err(AppError::NotFound);
            }
            Ok(_) => {}
            Err(e) => {
                self.return_stock(&deltas).await;
                return Err(e);
            }
        }

        self.get_purchase(purchase_id).await
    }

    async fn update_state(
        &self,
        user_id: i64,
        purchase_id: i64,
        state: String,
    ) -> AppResult<StateUpdate> {
        let state = normalize_state(&state)?;
        if !is_known_state(&state) {
            tracing::debug!("Purchase {} set to unlisted state {}", purchase_id, state);
        }

        match self
            .purchases
            .update_purchase_state(user_id, purchase_id, state)
            .await?
        {
            WriteOutcome::Modified => Ok(StateUpdate::Updated),
            WriteOutcome::Unchanged => Ok(StateUpdate::Unchanged),
            WriteOutcome::Missing => Err(AppError::NotFound),
        }
    }

    async fn delete_purchase(&self, purchase_id: i64) -> AppResult<()> {
        let purchase = self.get_purchase(purchase_id).await?;

        if self.purchases.delete(purchase_id).await?.is_missing() {
            return Err(AppError::NotFound);
        }

        self.return_stock(&stock_deltas(&[], &purchase.products)).await;
        Ok(())
    }
}
