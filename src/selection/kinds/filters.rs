use tracing::debug;

use crate::events::Subscription;
use crate::filters::store::StoreItem;
use crate::filters::{
    Definition, DisabledEntity, DisabledRequest, DisabledStore, EntityTypeRef, FilterStore,
    Shared, StoreUpdate, UpdateRequest,
};
use crate::selection::dragdrop::{DragPayload, DropEvent, ListContent};
use crate::selection::entity::Entity;
use crate::selection::error::ProviderError;
use crate::selection::provider::{
    AvailableActions, ComponentDesc, EntityAction, MenuCommand, MenuItem, ProviderKind,
};

/// Lists the filter store
pub struct FiltersKind {
    filters: Shared<FilterStore>,
    disabled: Shared<DisabledStore>,
}

impl FiltersKind {
    pub fn new(filters: Shared<FilterStore>, disabled: Shared<DisabledStore>) -> Self {
        Self { filters, disabled }
    }

    fn set_active(&self, guids: &[String], active: bool) -> Result<bool, ProviderError> {
        let mut store = self.filters.borrow_mut();
        let mut changed = false;
        for guid in guids {
            changed |= store.update(guid, UpdateRequest { active: Some(active), ..Default::default() })?;
        }
        Ok(changed)
    }

    fn remove(&self, guids: &[String]) -> bool {
        let mut store = self.filters.borrow_mut();
        let own = guids.iter().filter(|guid| store.find(guid).is_some()).count();
        if own == 0 {
            return false;
        }
        if own == store.len() {
            store.clear();
        } else {
            for filter in store.delete(guids) {
                filter.release();
            }
        }
        true
    }

    fn disable(&self, guids: &[String]) -> bool {
        let removed = self.filters.borrow_mut().delete(guids);
        if removed.is_empty() {
            return false;
        }
        let mut disabled = self.disabled.borrow_mut();
        for filter in removed {
            debug!(uuid = filter.uuid(), "filter disabled");
            disabled.add(DisabledRequest::new(DisabledEntity::Filter(filter)));
        }
        true
    }
}

impl ProviderKind for FiltersKind {
    type Item = Definition;

    fn list_id(&self) -> ListContent {
        ListContent::FiltersList
    }

    fn items(&self) -> Vec<(String, Definition)> {
        self.filters
            .borrow()
            .get()
            .iter()
            .map(|filter| (filter.uuid().to_string(), filter.definition().clone()))
            .collect()
    }

    fn watch(&self) -> Option<Subscription<StoreUpdate>> {
        Some(self.filters.borrow().subscribe())
    }

    fn reorder(&self, prev: usize, curt: usize) {
        self.filters.borrow_mut().reorder(prev, curt);
    }

    fn panel_name(&self) -> String {
        "Filters".to_string()
    }

    fn panel_desc(&self, count: usize) -> String {
        format!("{count} filter{}", if count > 1 { "s" } else { "" })
    }

    fn details_panel_name(&self) -> Option<String> {
        Some("Filter Details".to_string())
    }

    fn details_panel_desc(&self, selected: Option<&Entity<Definition>>) -> Option<String> {
        Some(selected.map(|entity| entity.extract().filter.filter.clone()).unwrap_or_default())
    }

    fn list_component(&self) -> Option<ComponentDesc> {
        Some(ComponentDesc::FiltersList)
    }

    fn details_component(&self) -> Option<ComponentDesc> {
        Some(ComponentDesc::FilterDetails)
    }

    fn content_if_empty(&self) -> Option<ComponentDesc> {
        Some(ComponentDesc::FiltersPlaceholder)
    }

    fn context_menu_items(
        &self,
        _target: &Entity<Definition>,
        selected: &[Entity<Definition>],
    ) -> Vec<MenuItem> {
        if selected.len() != 1 {
            return Vec::new();
        }
        vec![MenuItem { caption: "Show Matches".to_string(), command: MenuCommand::ShowMatches }]
    }

    fn actions(&self, selected: &[Entity<Definition>]) -> AvailableActions {
        AvailableActions {
            activate: selected.iter().any(|entity| !entity.extract().active),
            deactivate: selected.iter().any(|entity| entity.extract().active),
            remove: !selected.is_empty(),
            edit: selected.len() == 1,
            disable: !selected.is_empty(),
            enable: false,
        }
    }

    fn perform(&self, action: EntityAction, guids: &[String]) -> Result<bool, ProviderError> {
        match action {
            EntityAction::Activate => self.set_active(guids, true),
            EntityAction::Deactivate => self.set_active(guids, false),
            EntityAction::Remove => Ok(self.remove(guids)),
            EntityAction::Disable => Ok(self.disable(guids)),
            EntityAction::Edit | EntityAction::Enable => Ok(false),
        }
    }

    fn search(&self, entity: &Entity<Definition>) -> Option<Definition> {
        Some(entity.extract().clone())
    }

    fn is_viable(&self, dragging: Option<&DragPayload>) -> bool {
        matches!(dragging, Some(DragPayload::Disabled { kind: EntityTypeRef::Filter, .. }))
    }

    fn accept_drop(&self, event: &DropEvent) -> bool {
        let DragPayload::Disabled { uuid, kind: EntityTypeRef::Filter } = &event.payload else {
            return false;
        };
        let removed = self.disabled.borrow_mut().delete(&[uuid]);
        let mut accepted = false;
        for request in removed {
            match request.into_entity() {
                DisabledEntity::Filter(filter) => {
                    self.filters.borrow_mut().insert(event.current_index, filter);
                    accepted = true;
                }
            }
        }
        accepted
    }
}
