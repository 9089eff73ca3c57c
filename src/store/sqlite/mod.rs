//! SQLite market store.
//!
//! Every unit of work runs inside an IMMEDIATE transaction, which takes the
//! database write lock up front. Two units on the same market therefore
//! cannot both read a book level before either consumes it.

pub mod connection;
pub mod model;
pub mod schema;

use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::SqliteConnection;
use tracing::debug;

use self::connection::{
    configure_sqlite_connection, create_pool, run_migrations, DbConnection, DbPool,
};
use self::model::{
    market_key, LevelRow, MarketRow, NewOrderRow, OrderRow, PositionRow, ResolutionRow,
};
use self::schema::{markets, order_book_levels, orders, positions, resolutions};
use super::MarketStore;
use crate::domain::{Market, MarketId, Order, OrderBook};
use crate::engine::MarketState;
use crate::error::{Error, ExchangeError, Result};

/// Durable store backed by a pooled SQLite database.
#[derive(Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    /// Create a store over an existing pool. Migrations must already have run.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Open `database_url`, creating and migrating it as needed.
    ///
    /// # Errors
    /// Returns an error if the pool cannot be built or migrations fail.
    pub fn open(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url)?;
        run_migrations(&pool)?;
        Ok(Self::new(pool))
    }

    fn conn(&self) -> Result<DbConnection> {
        let mut conn = self
            .pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))?;
        configure_sqlite_connection(&mut conn)?;
        Ok(conn)
    }

    fn find_market(conn: &mut SqliteConnection, id: &MarketId) -> Result<MarketRow> {
        markets::table
            .find(market_key(id))
            .select(MarketRow::as_select())
            .first::<MarketRow>(conn)
            .optional()?
            .ok_or_else(|| ExchangeError::market_not_found(id).into())
    }

    fn load_with(conn: &mut SqliteConnection, id: &MarketId) -> Result<MarketState> {
        let key = market_key(id);
        let (market, book_sequence) = Self::find_market(conn, id)?.into_market()?;

        let positions = positions::table
            .filter(positions::market_id.eq(&key))
            .select(PositionRow::as_select())
            .load::<PositionRow>(conn)?
            .into_iter()
            .map(PositionRow::into_position)
            .collect::<Result<Vec<_>>>()?;

        let levels = order_book_levels::table
            .filter(order_book_levels::market_id.eq(&key))
            .select(LevelRow::as_select())
            .load::<LevelRow>(conn)?
            .into_iter()
            .map(LevelRow::into_level)
            .collect::<Result<Vec<_>>>()?;

        let resolution = resolutions::table
            .filter(resolutions::market_id.eq(&key))
            .select(ResolutionRow::as_select())
            .first::<ResolutionRow>(conn)
            .optional()?
            .map(ResolutionRow::into_resolution)
            .transpose()?;

        let book = OrderBook::restore(market.id, levels, book_sequence);
        Ok(MarketState::from_parts(market, positions, book, resolution))
    }

    fn save_with(conn: &mut SqliteConnection, state: &mut MarketState) -> Result<()> {
        let key = market_key(&state.market.id);

        let row = MarketRow::from_market(&state.market, state.book.next_sequence())?;
        diesel::update(markets::table.find(&key))
            .set(&row)
            .execute(conn)?;

        for position in state.positions() {
            diesel::replace_into(positions::table)
                .values(&PositionRow::from_position(&position)?)
                .execute(conn)?;
        }

        // Levels are small in number; rewrite the market's book wholesale.
        diesel::delete(order_book_levels::table.filter(order_book_levels::market_id.eq(&key)))
            .execute(conn)?;
        let levels = state
            .book
            .levels()
            .map(LevelRow::from_level)
            .collect::<Result<Vec<_>>>()?;
        if !levels.is_empty() {
            diesel::insert_into(order_book_levels::table)
                .values(&levels)
                .execute(conn)?;
        }

        let orders = state
            .take_journal()
            .iter()
            .map(NewOrderRow::from_order)
            .collect::<Result<Vec<_>>>()?;
        if !orders.is_empty() {
            diesel::insert_into(orders::table)
                .values(&orders)
                .execute(conn)?;
        }

        if let Some(resolution) = &state.resolution {
            diesel::replace_into(resolutions::table)
                .values(&ResolutionRow::from_resolution(resolution))
                .execute(conn)?;
        }

        Ok(())
    }
}

impl MarketStore for SqliteStore {
    fn insert_market(&self, mut state: MarketState) -> Result<Market> {
        let mut conn = self.conn()?;
        let slug = state.market.slug.clone();
        let row = MarketRow::from_market(&state.market, state.book.next_sequence())?;

        conn.immediate_transaction(|conn| {
            diesel::insert_into(markets::table)
                .values(&row)
                .execute(conn)
                .map_err(|e| match e {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        Error::from(ExchangeError::SlugConflict { slug: slug.clone() })
                    }
                    other => Error::from(other),
                })?;
            Self::save_with(conn, &mut state)
        })?;

        debug!(market_id = %state.market.id, slug = %slug, "Stored market");
        Ok(state.market)
    }

    fn slug_exists(&self, slug: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        let count: i64 = markets::table
            .filter(markets::slug.eq(slug))
            .count()
            .get_result(&mut conn)?;
        Ok(count > 0)
    }

    fn get_market(&self, id: &MarketId) -> Result<Market> {
        let mut conn = self.conn()?;
        let (market, _) = Self::find_market(&mut conn, id)?.into_market()?;
        Ok(market)
    }

    fn list_markets(&self) -> Result<Vec<Market>> {
        let mut conn = self.conn()?;
        markets::table
            .order(markets::created_at.desc())
            .select(MarketRow::as_select())
            .load::<MarketRow>(&mut conn)?
            .into_iter()
            .map(|row| row.into_market().map(|(market, _)| market))
            .collect()
    }

    fn load(&self, id: &MarketId) -> Result<MarketState> {
        let mut conn = self.conn()?;
        conn.transaction(|conn| Self::load_with(conn, id))
    }

    fn list_orders(&self, id: &MarketId) -> Result<Vec<Order>> {
        let mut conn = self.conn()?;
        Self::find_market(&mut conn, id)?;
        orders::table
            .filter(orders::market_id.eq(market_key(id)))
            .order(orders::seq.asc())
            .select(OrderRow::as_select())
            .load::<OrderRow>(&mut conn)?
            .into_iter()
            .map(OrderRow::into_order)
            .collect()
    }

    fn transact<T, F>(&self, id: &MarketId, f: F) -> Result<T>
    where
        F: FnOnce(&mut MarketState) -> Result<T>,
    {
        let mut conn = self.conn()?;
        conn.immediate_transaction(|conn| {
            let mut state = Self::load_with(conn, id)?;
            let value = f(&mut state)?;
            Self::save_with(conn, &mut state)?;
            Ok(value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{OrderRequest, Side};
    use crate::engine::{create_market, place_order, resolve};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().unwrap();
        let url = dir.path().join("store.db");
        let store = SqliteStore::open(url.to_str().unwrap()).unwrap();
        (dir, store)
    }

    fn seeded(store: &SqliteStore, slug: &str) -> MarketId {
        let state = create_market(slug, "Question?", Some("desc"), dec!(50), Utc::now()).unwrap();
        store.insert_market(state).unwrap().id
    }

    #[test]
    fn inserted_market_loads_back_identically() {
        let (_dir, store) = store();
        let state = create_market("round", "Question?", None, dec!(33.335), Utc::now()).unwrap();
        let expected = state.clone();

        store.insert_market(state).unwrap();
        let loaded = store.load(&expected.market.id).unwrap();

        assert_eq!(loaded, expected);
        assert_eq!(loaded.market.yes_price.to_string(), "33.34");
    }

    #[test]
    fn duplicate_slug_is_a_conflict() {
        let (_dir, store) = store();
        seeded(&store, "taken");

        let state = create_market("taken", "Other?", None, dec!(50), Utc::now()).unwrap();
        let err = store.insert_market(state).unwrap_err();

        assert!(matches!(
            err.as_exchange(),
            Some(ExchangeError::SlugConflict { .. })
        ));
        assert!(store.slug_exists("taken").unwrap());
        assert_eq!(store.list_markets().unwrap().len(), 1);
    }

    #[test]
    fn committed_unit_persists_book_orders_and_positions() {
        let (_dir, store) = store();
        let id = seeded(&store, "persist");

        store
            .transact(&id, |state| {
                let now = Utc::now();
                place_order(state, &OrderRequest::buy(Side::No, dec!(50.00), 5), now)?;
                place_order(state, &OrderRequest::sell(Side::No, dec!(40.00), 5), now)?;
                Ok(())
            })
            .unwrap();

        let state = store.load(&id).unwrap();
        assert_eq!(state.position(Side::No).quantity, 5);
        let levels: Vec<_> = state.book.levels().collect();
        assert_eq!(levels.len(), 1);
        assert_eq!((levels[0].price, levels[0].quantity), (dec!(40.00), 5));

        let orders = store.list_orders(&id).unwrap();
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].resting_quantity, 5);
    }

    #[test]
    fn book_sequence_survives_reload() {
        let (_dir, store) = store();
        let id = seeded(&store, "sequence");

        store
            .transact(&id, |state| {
                let now = Utc::now();
                place_order(state, &OrderRequest::buy(Side::Yes, dec!(50.00), 4), now)?;
                place_order(state, &OrderRequest::sell(Side::Yes, dec!(70.00), 1), now)?;
                place_order(state, &OrderRequest::sell(Side::Yes, dec!(70.00), 1), now)?;
                Ok(())
            })
            .unwrap();
        // Consuming the earliest level must not let a later insert reuse its sequence.
        store
            .transact(&id, |state| {
                place_order(state, &OrderRequest::buy(Side::No, dec!(30.00), 1), Utc::now())?;
                Ok(())
            })
            .unwrap();

        let state = store.load(&id).unwrap();
        assert_eq!(state.book.next_sequence(), 3);
        assert_eq!(state.book.levels().next().unwrap().sequence, 2);
    }

    #[test]
    fn failed_unit_writes_nothing() {
        let (_dir, store) = store();
        let id = seeded(&store, "rollback");
        let before = store.load(&id).unwrap();

        let result: Result<()> = store.transact(&id, |state| {
            place_order(state, &OrderRequest::buy(Side::Yes, dec!(50.00), 5), Utc::now())?;
            place_order(state, &OrderRequest::sell(Side::Yes, dec!(50.00), 50), Utc::now())?;
            Ok(())
        });

        assert!(matches!(
            result.unwrap_err().as_exchange(),
            Some(ExchangeError::InsufficientPosition { .. })
        ));
        assert_eq!(store.load(&id).unwrap(), before);
        assert!(store.list_orders(&id).unwrap().is_empty());
    }

    #[test]
    fn resolution_is_stored_once() {
        let (_dir, store) = store();
        let id = seeded(&store, "resolve");

        store
            .transact(&id, |state| Ok(resolve(state, Side::Yes, Utc::now())?))
            .unwrap();
        let err = store
            .transact(&id, |state| Ok(resolve(state, Side::No, Utc::now())?))
            .unwrap_err();

        assert!(matches!(
            err.as_exchange(),
            Some(ExchangeError::AlreadyResolved { .. })
        ));
        let state = store.load(&id).unwrap();
        assert_eq!(state.resolution.unwrap().outcome, Side::Yes);
    }

    #[test]
    fn list_markets_is_newest_first() {
        let (_dir, store) = store();
        let first = seeded(&store, "first");
        let second = seeded(&store, "second");

        let ids: Vec<_> = store.list_markets().unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn missing_market_is_not_found() {
        let (_dir, store) = store();
        let err = store.list_orders(&MarketId::new()).unwrap_err();
        assert!(matches!(
            err.as_exchange(),
            Some(ExchangeError::NotFound { .. })
        ));
    }
}
