// ============================================================================
// CATALOG VIEWMODEL - Animal listings, filters, featured carousel
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Interval;

use crate::error::{AppError, AppResult};
use crate::models::animal::{Animal, Breed, CatalogQuery, Category};
use crate::models::PageCursor;
use crate::services::{ApiClient, RequestTracker};
use crate::state::{AppState, UpdateType};

const LISTING_KEY: &str = "animals";
const CATEGORIES_KEY: &str = "categories";
const BREEDS_KEY: &str = "breeds";
const FEATURED_KEY: &str = "featured";

#[derive(Clone, Default)]
struct CatalogListing {
    animals: Rc<RefCell<Vec<Animal>>>,
    cursor: Rc<RefCell<PageCursor>>,
    query: Rc<RefCell<CatalogQuery>>,
    categories: Rc<RefCell<Vec<Category>>>,
    breeds: Rc<RefCell<Vec<Breed>>>,
    featured: Rc<RefCell<Vec<Animal>>>,
    loading: Rc<RefCell<bool>>,
    error: Rc<RefCell<Option<String>>>,
}

#[derive(Clone)]
pub struct CatalogViewModel {
    state: AppState,
    api: ApiClient,
    tracker: RequestTracker,
    listing: CatalogListing,
    page_size: u32,
    refresh_ms: u32,
}

impl CatalogViewModel {
    pub fn new(state: AppState, api: ApiClient, page_size: u32, refresh_ms: u32) -> Self {
        Self {
            state,
            api,
            tracker: RequestTracker::new(),
            listing: CatalogListing::default(),
            page_size: page_size.max(1),
            refresh_ms,
        }
    }

    pub fn get_animals(&self) -> Vec<Animal> {
        self.listing.animals.borrow().clone()
    }

    pub fn get_cursor(&self) -> PageCursor {
        *self.listing.cursor.borrow()
    }

    pub fn get_query(&self) -> CatalogQuery {
        self.listing.query.borrow().clone()
    }

    pub fn get_categories(&self) -> Vec<Category> {
        self.listing.categories.borrow().clone()
    }

    pub fn get_breeds(&self) -> Vec<Breed> {
        self.listing.breeds.borrow().clone()
    }

    pub fn get_featured(&self) -> Vec<Animal> {
        self.listing.featured.borrow().clone()
    }

    pub fn get_loading(&self) -> bool {
        *self.listing.loading.borrow()
    }

    pub fn get_error(&self) -> Option<String> {
        self.listing.error.borrow().clone()
    }

    /// Categories and breeds for the filter form, fetched concurrently.
    pub async fn load_filters(&self) -> AppResult<()> {
        let categories_ticket = self.tracker.begin(CATEGORIES_KEY);
        let breeds_ticket = self.tracker.begin(BREEDS_KEY);

        let (categories, breeds) = futures::join!(self.api.categories(), self.api.breeds());

        let mut first_error = None;
        match categories {
            Ok(list) if self.tracker.accept(&categories_ticket) => {
                *self.listing.categories.borrow_mut() = list;
            }
            Ok(_) => {}
            Err(e) => first_error = Some(e),
        }
        match breeds {
            Ok(list) if self.tracker.accept(&breeds_ticket) => {
                *self.listing.breeds.borrow_mut() = list;
            }
            Ok(_) => {}
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }

        self.state.notify_subscribers(UpdateType::Catalog);
        match first_error {
            Some(e) => Err(self.fail(e)),
            None => Ok(()),
        }
    }

    /// Load `page` of the listing for `query`.
    pub async fn browse(&self, query: CatalogQuery, page: u32) -> AppResult<()> {
        let ticket = self.tracker.begin(LISTING_KEY);
        *self.listing.query.borrow_mut() = query.clone();
        *self.listing.loading.borrow_mut() = true;
        self.state.notify_subscribers(UpdateType::Catalog);

        let result = self.api.browse_animals(&query, page, self.page_size).await;

        let outcome = match result {
            Ok(animal_page) => {
                if self.tracker.accept(&ticket) {
                    log::info!("🐄 {} animals on page {}", animal_page.animals.len(), page);
                    *self.listing.animals.borrow_mut() = animal_page.animals;
                    *self.listing.cursor.borrow_mut() =
                        PageCursor::new(page, animal_page.pagination.total_pages);
                    *self.listing.error.borrow_mut() = None;
                }
                Ok(())
            }
            Err(e) if self.tracker.is_current(&ticket) => Err(self.fail(e)),
            Err(e) => Err(e),
        };
        *self.listing.loading.borrow_mut() = false;
        self.state.notify_subscribers(UpdateType::Catalog);
        outcome
    }

    /// Same query, another page. Ignored outside `[1, total_pages]`.
    pub async fn change_page(&self, page: u32) -> AppResult<()> {
        if !self.get_cursor().contains(page) {
            return Ok(());
        }
        self.browse(self.get_query(), page).await
    }

    pub async fn animal(&self, animal_id: &str) -> AppResult<Animal> {
        if animal_id.trim().is_empty() {
            return Err(AppError::validation("Animal id is required"));
        }
        self.api.animal(animal_id).await.map_err(|e| self.fail(e))
    }

    /// Other animals from the same vendor.
    pub async fn similar(&self, vendor_id: i64) -> AppResult<Vec<Animal>> {
        self.api
            .similar_animals(vendor_id)
            .await
            .map_err(|e| self.fail(e))
    }

    pub async fn refresh_featured(&self) -> AppResult<()> {
        let ticket = self.tracker.begin(FEATURED_KEY);
        match self.api.featured_animals().await {
            Ok(animals) => {
                if self.tracker.accept(&ticket) {
                    *self.listing.featured.borrow_mut() = animals;
                    self.state.notify_subscribers(UpdateType::Catalog);
                }
                Ok(())
            }
            Err(e) => {
                log::warn!("⚠️ Featured refresh failed: {}", e);
                Err(e)
            }
        }
    }

    /// Refresh now and then every `featured_refresh_ms` until the handle
    /// is stopped or dropped.
    pub fn start_featured_refresh(&self) -> FeaturedRefresh {
        let spawn_refresh = {
            let vm = self.clone();
            move || {
                let vm = vm.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let _ = vm.refresh_featured().await;
                });
            }
        };
        spawn_refresh();
        log::info!("⏱️ Featured refresh every {} ms", self.refresh_ms);
        FeaturedRefresh {
            interval: Some(Interval::new(self.refresh_ms, spawn_refresh)),
            tracker: self.tracker.clone(),
        }
    }

    fn fail(&self, err: AppError) -> AppError {
        log::warn!("⚠️ Catalog: {}", err);
        *self.listing.error.borrow_mut() = Some(err.user_message());
        self.state.notify_subscribers(UpdateType::Catalog);
        err
    }
}

/// Running featured refresh. Dropping it cancels the timer; responses of
/// ticks already in flight are discarded.
pub struct FeaturedRefresh {
    interval: Option<Interval>,
    tracker: RequestTracker,
}

impl FeaturedRefresh {
    pub fn stop(&mut self) {
        if let Some(interval) = self.interval.take() {
            interval.cancel();
            log::debug!("⏹️ Featured refresh stopped");
        }
        self.tracker.supersede(FEATURED_KEY);
    }

    pub fn is_running(&self) -> bool {
        self.interval.is_some()
    }
}

impl Drop for FeaturedRefresh {
    fn drop(&mut self) {
        self.stop();
    }
}
