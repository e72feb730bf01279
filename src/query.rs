use log::*;

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::error::*;

/// Cache key the profile query lives under.  Any part of the application
/// interested in the same record shares it.
pub const USER_INFO_KEY: &str = "userinfo";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryStatus {
  Pending,
  Success,
  Error,
}

/// Cached fetch state.  Every invalidation bumps the epoch; a fetch result
/// carrying a stale epoch is discarded.  Stale and Fetching keep the last
/// known-good value so readers are not thrown back to a placeholder while
/// fresh data is on the way.
enum QueryState<T> {
  Stale(u64, Option<Rc<T>>),
  Fetching(u64, Option<Rc<T>>),
  Ready(u64, Rc<T>),
  Failed(u64, String),
}

impl<T> QueryState<T> {
  fn epoch(&self) -> u64 {
    match self {
      QueryState::Stale(epoch, _) => *epoch,
      QueryState::Fetching(epoch, _) => *epoch,
      QueryState::Ready(epoch, _) => *epoch,
      QueryState::Failed(epoch, _) => *epoch,
    }
  }
}

type Fetcher<T> = Box<dyn Fn() -> LocalBoxFuture<'static, Result<T>>>;

/// One keyed, cached, invalidatable fetch.
pub struct Query<T> {
  key: &'static str,
  state: RefCell<QueryState<T>>,
  fetcher: Fetcher<T>,
}

impl<T> Query<T> {
  pub fn new(key: &'static str, fetcher: Fetcher<T>) -> Rc<Self> {
    Rc::new(Self {
      key,
      state: RefCell::new(QueryState::Stale(0, None)),
      fetcher,
    })
  }

  pub fn key(&self) -> &'static str {
    self.key
  }

  pub fn status(&self) -> QueryStatus {
    match &*self.state.borrow() {
      QueryState::Stale(_, Some(_)) | QueryState::Fetching(_, Some(_)) => QueryStatus::Success,
      QueryState::Stale(..) | QueryState::Fetching(..) => QueryStatus::Pending,
      QueryState::Ready(..) => QueryStatus::Success,
      QueryState::Failed(..) => QueryStatus::Error,
    }
  }

  pub fn data(&self) -> Option<Rc<T>> {
    match &*self.state.borrow() {
      QueryState::Stale(_, data) | QueryState::Fetching(_, data) => data.clone(),
      QueryState::Ready(_, data) => Some(data.clone()),
      QueryState::Failed(..) => None,
    }
  }

  pub fn error(&self) -> Option<String> {
    match &*self.state.borrow() {
      QueryState::Failed(_, message) => Some(message.clone()),
      _ => None,
    }
  }

  /// Fetch when the cached value is stale.  No-op while fresh, failed, or
  /// while a fetch for the current epoch is already in flight.
  pub async fn ensure(&self) {
    let (epoch, data) = match &*self.state.borrow() {
      QueryState::Stale(epoch, data) => (*epoch, data.clone()),
      _ => return,
    };
    debug!("query {}: epoch {}: Stale -> Fetching", self.key, epoch);
    *self.state.borrow_mut() = QueryState::Fetching(epoch, data);

    let result = (self.fetcher)().await;

    // an invalidation while the fetch was in flight wins.
    if self.state.borrow().epoch() != epoch {
      debug!("query {}: epoch {}: stale result discarded", self.key, epoch);
      return;
    }
    match result {
      Ok(value) => {
        debug!("query {}: epoch {}: Fetching -> Ready", self.key, epoch);
        *self.state.borrow_mut() = QueryState::Ready(epoch, Rc::new(value));
      },
      Err(err) => {
        info!("query {}: epoch {}: fetch failed: {}", self.key, epoch, err);
        *self.state.borrow_mut() = QueryState::Failed(epoch, err.to_string());
      },
    }
  }

  /// Mark the cached value stale: the next read fetches fresh data and any
  /// in-flight fetch result is discarded.
  pub fn invalidate(&self) {
    let mut state = self.state.borrow_mut();
    let epoch = state.epoch() + 1;
    let data = match &*state {
      QueryState::Stale(_, data) | QueryState::Fetching(_, data) => data.clone(),
      QueryState::Ready(_, data) => Some(data.clone()),
      QueryState::Failed(..) => None,
    };
    debug!("query {}: invalidated, epoch {}", self.key, epoch);
    *state = QueryState::Stale(epoch, data);
  }

  pub async fn refetch(&self) {
    self.invalidate();
    self.ensure().await;
  }
}

trait AnyQuery {
  fn invalidate(&self);
}

impl<T> AnyQuery for Query<T> {
  fn invalidate(&self) {
    Query::invalidate(self)
  }
}

/// Key-indexed registry so a component can invalidate a query it does not
/// own, the way the edit form invalidates the cached profile.
#[derive(Clone, Default)]
pub struct QueryClient {
  queries: Rc<RefCell<HashMap<&'static str, Rc<dyn AnyQuery>>>>,
}

impl QueryClient {
  pub fn new() -> Self {
    Default::default()
  }

  pub fn register<T: 'static>(&self, query: Rc<Query<T>>) {
    self.queries.borrow_mut().insert(query.key(), query);
  }

  pub fn invalidate(&self, key: &str) {
    match self.queries.borrow().get(key) {
      Some(query) => query.invalidate(),
      None => debug!("invalidate: unknown query key: {}", key),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationState {
  Idle,
  Pending,
  Succeeded,
  Failed(String),
}

/// Single in-flight mutation.  `begin` refuses a second request while one
/// is outstanding.
pub struct Mutation {
  state: RefCell<MutationState>,
}

impl Mutation {
  pub fn new() -> Self {
    Self {
      state: RefCell::new(MutationState::Idle),
    }
  }

  pub fn state(&self) -> MutationState {
    self.state.borrow().clone()
  }

  pub fn is_pending(&self) -> bool {
    *self.state.borrow() == MutationState::Pending
  }

  /// Move to Pending.  Returns false while a request is outstanding.
  pub fn begin(&self) -> bool {
    if self.is_pending() {
      return false;
    }
    *self.state.borrow_mut() = MutationState::Pending;
    true
  }

  pub fn succeed(&self) {
    *self.state.borrow_mut() = MutationState::Succeeded;
  }

  pub fn fail(&self, message: String) {
    *self.state.borrow_mut() = MutationState::Failed(message);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::cell::Cell;
  use std::collections::VecDeque;

  use futures::channel::oneshot;
  use futures::executor::{block_on, LocalPool};
  use futures::task::LocalSpawnExt;

  fn counting_query(count: Rc<Cell<u32>>) -> Rc<Query<u32>> {
    Query::new(
      "test",
      Box::new(move || {
        let count = count.clone();
        Box::pin(async move {
          count.set(count.get() + 1);
          Ok(count.get())
        })
      }),
    )
  }

  #[test]
  fn ensure_fetches_once() {
    let count = Rc::new(Cell::new(0));
    let query = counting_query(count.clone());

    assert_eq!(query.status(), QueryStatus::Pending);
    block_on(query.ensure());
    block_on(query.ensure());
    assert_eq!(count.get(), 1);
    assert_eq!(query.status(), QueryStatus::Success);
    assert_eq!(*query.data().unwrap(), 1);
  }

  #[test]
  fn invalidate_triggers_refetch_on_next_read() {
    let count = Rc::new(Cell::new(0));
    let query = counting_query(count.clone());

    block_on(query.ensure());
    query.invalidate();
    // the stale value is still readable while a refetch is due.
    assert_eq!(query.status(), QueryStatus::Success);
    assert_eq!(*query.data().unwrap(), 1);

    block_on(query.ensure());
    assert_eq!(count.get(), 2);
    assert_eq!(*query.data().unwrap(), 2);
  }

  #[test]
  fn failed_fetch_keeps_message_until_refetch() {
    let attempts = Rc::new(Cell::new(0));
    let query: Rc<Query<u32>> = Query::new(
      "test",
      Box::new({
        let attempts = attempts.clone();
        move || {
          attempts.set(attempts.get() + 1);
          let failing = attempts.get() == 1;
          Box::pin(async move {
            if failing {
              Err(Error::Gateway("boom".to_string()))
            } else {
              Ok(7)
            }
          })
        }
      }),
    );

    block_on(query.ensure());
    assert_eq!(query.status(), QueryStatus::Error);
    assert_eq!(query.error().unwrap(), "boom");
    // ensure alone does not retry a failed query.
    block_on(query.ensure());
    assert_eq!(attempts.get(), 1);

    block_on(query.refetch());
    assert_eq!(query.status(), QueryStatus::Success);
    assert_eq!(*query.data().unwrap(), 7);
  }

  #[test]
  fn in_flight_result_is_discarded_after_invalidate() {
    let gates: Rc<RefCell<VecDeque<oneshot::Receiver<u32>>>> = Rc::new(RefCell::new(VecDeque::new()));
    let query: Rc<Query<u32>> = Query::new(
      "test",
      Box::new({
        let gates = gates.clone();
        move || {
          let rx = gates.borrow_mut().pop_front().expect("gated fetch");
          Box::pin(async move {
            rx.await.map_err(|_| Error::Gateway("canceled".to_string()))
          })
        }
      }),
    );

    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    let (tx, rx) = oneshot::channel();
    gates.borrow_mut().push_back(rx);
    let q = query.clone();
    spawner.spawn_local(async move { q.ensure().await }).unwrap();
    pool.run_until_stalled();

    // fetch is parked; invalidating now must win over its eventual result.
    query.invalidate();
    tx.send(1).unwrap();
    pool.run_until_stalled();
    assert_eq!(query.data(), None);
    assert_eq!(query.status(), QueryStatus::Pending);

    // the next read fetches fresh data.
    let (tx, rx) = oneshot::channel();
    gates.borrow_mut().push_back(rx);
    let q = query.clone();
    spawner.spawn_local(async move { q.ensure().await }).unwrap();
    tx.send(2).unwrap();
    pool.run_until_stalled();
    assert_eq!(*query.data().unwrap(), 2);
  }

  #[test]
  fn client_invalidates_by_key() {
    let count = Rc::new(Cell::new(0));
    let query = counting_query(count.clone());
    let client = QueryClient::new();
    client.register(query.clone());

    block_on(query.ensure());
    client.invalidate("test");
    block_on(query.ensure());
    assert_eq!(count.get(), 2);

    // unknown keys are ignored.
    client.invalidate("nope");
  }

  #[test]
  fn mutation_is_single_flight() {
    let mutation = Mutation::new();
    assert_eq!(mutation.state(), MutationState::Idle);
    assert!(mutation.begin());
    assert!(!mutation.begin());
    mutation.succeed();
    assert_eq!(mutation.state(), MutationState::Succeeded);
    assert!(mutation.begin());
    mutation.fail("boom".to_string());
    assert_eq!(mutation.state(), MutationState::Failed("boom".to_string()));
    assert!(mutation.begin());
  }
}
