// ============================================================================
// VENDOR VIEWMODEL - The signed-in vendor's listings
// ============================================================================
// Every change is applied locally only after the server confirms it, and
// a confirmed change discards any list read still in flight.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{AppError, AppResult};
use crate::models::animal::{Animal, AnimalDraft};
use crate::services::{ApiClient, InFlight, RequestTracker};
use crate::state::{AppState, UpdateType};
use crate::viewmodels::AuthViewModel;

const LISTINGS_KEY: &str = "vendor:listings";

#[derive(Clone)]
pub struct VendorViewModel {
    state: AppState,
    api: ApiClient,
    auth: AuthViewModel,
    tracker: RequestTracker,
    in_flight: InFlight,
    animals: Rc<RefCell<Vec<Animal>>>,
    error: Rc<RefCell<Option<String>>>,
}

impl VendorViewModel {
    pub fn new(state: AppState, api: ApiClient, auth: AuthViewModel) -> Self {
        Self {
            state,
            api,
            auth,
            tracker: RequestTracker::new(),
            in_flight: InFlight::new(),
            animals: Rc::new(RefCell::new(Vec::new())),
            error: Rc::new(RefCell::new(None)),
        }
    }

    pub fn get_animals(&self) -> Vec<Animal> {
        self.animals.borrow().clone()
    }

    pub fn get_error(&self) -> Option<String> {
        self.error.borrow().clone()
    }

    pub async fn load(&self) -> AppResult<()> {
        let token = self.auth.bearer().map_err(|e| self.fail(e))?;
        let ticket = self.tracker.begin(LISTINGS_KEY);

        match self.api.vendor_animals(Some(&token)).await {
            Ok(animals) => {
                if self.tracker.accept(&ticket) {
                    log::info!("🐑 {} listings loaded", animals.len());
                    *self.animals.borrow_mut() = animals;
                    self.applied();
                }
                Ok(())
            }
            Err(e) if self.tracker.is_current(&ticket) => Err(self.fail(e)),
            Err(e) => Err(self.auth.handle_error(e)),
        }
    }

    pub async fn create(&self, draft: AnimalDraft) -> AppResult<Animal> {
        draft.validate().map_err(|e| self.fail(e))?;
        let token = self.auth.bearer().map_err(|e| self.fail(e))?;
        let _guard = self.in_flight.acquire(LISTINGS_KEY, "Saving listing")?;

        let animal = self
            .api
            .create_animal(&draft, Some(&token))
            .await
            .map_err(|e| self.fail(e))?;
        self.tracker.supersede(LISTINGS_KEY);
        log::info!("✅ Listed {}", animal.name);
        self.animals.borrow_mut().push(animal.clone());
        self.applied();
        Ok(animal)
    }

    pub async fn update(&self, animal_id: &str, draft: AnimalDraft) -> AppResult<Animal> {
        draft.validate().map_err(|e| self.fail(e))?;
        let token = self.auth.bearer().map_err(|e| self.fail(e))?;
        let _guard = self.in_flight.acquire(LISTINGS_KEY, "Saving listing")?;

        let animal = self
            .api
            .update_animal(animal_id, &draft, Some(&token))
            .await
            .map_err(|e| self.fail(e))?;
        self.tracker.supersede(LISTINGS_KEY);
        {
            let mut animals = self.animals.borrow_mut();
            match animals.iter_mut().find(|a| a.id == animal_id) {
                Some(existing) => *existing = animal.clone(),
                None => animals.push(animal.clone()),
            }
        }
        self.applied();
        Ok(animal)
    }

    pub async fn delete(&self, animal_id: &str) -> AppResult<()> {
        if animal_id.trim().is_empty() {
            return Err(self.fail(AppError::validation(
                "Animal ID is required for deletion",
            )));
        }
        let token = self.auth.bearer().map_err(|e| self.fail(e))?;
        let _guard = self.in_flight.acquire(LISTINGS_KEY, "Deleting listing")?;

        self.api
            .delete_animal(animal_id, Some(&token))
            .await
            .map_err(|e| self.fail(e))?;
        self.tracker.supersede(LISTINGS_KEY);
        self.animals.borrow_mut().retain(|a| a.id != animal_id);
        log::info!("🗑️ Listing {} deleted", animal_id);
        self.applied();
        Ok(())
    }

    fn applied(&self) {
        *self.error.borrow_mut() = None;
        self.state.notify_subscribers(UpdateType::Vendor);
    }

    fn fail(&self, err: AppError) -> AppError {
        log::warn!("⚠️ Vendor: {}", err);
        *self.error.borrow_mut() = Some(err.user_message());
        self.state.notify_subscribers(UpdateType::Vendor);
        self.auth.handle_error(err)
    }
}
