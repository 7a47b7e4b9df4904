//! 账户存储服务
//!
//! 维护有序的账户列表。每个变更操作在返回前把完整列表序列化写回
//! [`KeyValueStore`]，写入成功后才提交到内存。

use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use crate::error::{CoreError, CoreResult};
use crate::traits::KeyValueStore;
use crate::types::{Account, AccountErrors, AccountFormPatch, MetkaItem};

/// 账户列表的存储键
pub const ACCOUNTS_KEY: &str = "accounts";

/// 账户存储
pub struct AccountStore {
    storage: Arc<dyn KeyValueStore>,
    /// 使用 Arc<Vec> 让读取方只 clone 指针
    accounts: RwLock<Arc<Vec<Account>>>,
}

impl AccountStore {
    /// 创建账户存储，并从 `storage` 恢复已保存的账户
    ///
    /// 读取或解析失败时记录日志并以空列表启动，不会返回错误
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        let accounts = load_accounts(storage.as_ref());
        log::info!("Loaded {} accounts from store", accounts.len());

        Self {
            storage,
            accounts: RwLock::new(Arc::new(accounts)),
        }
    }

    /// 当前账户列表快照
    pub fn accounts(&self) -> Arc<Vec<Account>> {
        let accounts = self.accounts.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&accounts)
    }

    /// 根据 ID 获取账户
    pub fn find_by_id(&self, id: &str) -> Option<Account> {
        self.accounts().iter().find(|a| a.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.accounts().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts().is_empty()
    }

    /// 新增账户，追加到列表末尾
    ///
    /// 返回新账户的快照，后续修改需通过 `update_*` 方法
    pub fn add_account(&self) -> CoreResult<Account> {
        let mut guard = self.write_guard()?;

        let account = Account::new(generate_id(&guard));
        let mut next = (**guard).clone();
        next.push(account.clone());

        self.persist(&next)?;
        *guard = Arc::new(next);

        log::debug!("Added account {}", account.id);
        Ok(account)
    }

    /// 合并表单字段，未提供的字段保持原值
    ///
    /// 返回是否找到账户；未找到时不写存储
    pub fn update_account(&self, id: &str, patch: AccountFormPatch) -> CoreResult<bool> {
        self.modify_account(id, |account| patch.apply_to(&mut account.form_data))
    }

    /// 整体替换校验错误
    pub fn update_errors(&self, id: &str, errors: AccountErrors) -> CoreResult<bool> {
        self.modify_account(id, |account| account.errors = errors)
    }

    /// 整体替换标签列表
    pub fn update_metka(&self, id: &str, metka: Vec<MetkaItem>) -> CoreResult<bool> {
        self.modify_account(id, |account| account.metka = metka)
    }

    /// 删除账户
    ///
    /// 无论是否删除了记录都会写回存储。返回是否删除了记录
    pub fn delete_account(&self, id: &str) -> CoreResult<bool> {
        let mut guard = self.write_guard()?;

        let next: Vec<Account> = guard.iter().filter(|a| a.id != id).cloned().collect();
        let removed = next.len() != guard.len();

        self.persist(&next)?;
        *guard = Arc::new(next);

        if removed {
            log::info!("Deleted account {id} from store");
        } else {
            log::debug!("Delete skipped, account {id} not found");
        }
        Ok(removed)
    }

    fn modify_account<F>(&self, id: &str, f: F) -> CoreResult<bool>
    where
        F: FnOnce(&mut Account),
    {
        let mut guard = self.write_guard()?;

        let Some(pos) = guard.iter().position(|a| a.id == id) else {
            log::debug!("Update skipped, account {id} not found");
            return Ok(false);
        };

        let mut next = (**guard).clone();
        f(&mut next[pos]);

        self.persist(&next)?;
        *guard = Arc::new(next);
        Ok(true)
    }

    fn write_guard(&self) -> CoreResult<RwLockWriteGuard<'_, Arc<Vec<Account>>>> {
        self.accounts
            .write()
            .map_err(|_| CoreError::StorageError("Account store lock poisoned".to_string()))
    }

    /// 序列化完整列表并覆盖写入
    fn persist(&self, accounts: &[Account]) -> CoreResult<()> {
        let value = serde_json::to_string(accounts)?;
        self.storage.set(ACCOUNTS_KEY, &value).map_err(|e| {
            log::error!("Failed to save accounts: {e}");
            e
        })?;

        log::debug!("Saved {} accounts to store", accounts.len());
        Ok(())
    }
}

/// 从存储加载账户
///
/// 读取或解析失败、或不是数组时回退为空列表；数组中结构不符的元素单独跳过
fn load_accounts(storage: &dyn KeyValueStore) -> Vec<Account> {
    let saved = match storage.get(ACCOUNTS_KEY) {
        Ok(Some(saved)) => saved,
        Ok(None) => return Vec::new(),
        Err(e) => {
            log::error!("Failed to read saved accounts: {e}");
            return Vec::new();
        }
    };

    let parsed: serde_json::Value = match serde_json::from_str(&saved) {
        Ok(value) => value,
        Err(e) => {
            log::error!("Failed to parse saved accounts: {e}");
            return Vec::new();
        }
    };

    let serde_json::Value::Array(items) = parsed else {
        log::warn!("Saved accounts is not an array, starting empty");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Account>(item) {
            Ok(account) => Some(account),
            Err(e) => {
                log::warn!("Skipping saved account #{index} with unexpected shape: {e}");
                None
            }
        })
        .collect()
}

/// 生成不与现有账户冲突的 ID
fn generate_id(existing: &[Account]) -> String {
    loop {
        let id = uuid::Uuid::new_v4().to_string();
        if !existing.iter().any(|a| a.id == id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::types::AccountType;

    fn empty_store() -> (Arc<MemoryStorage>, AccountStore) {
        let storage = Arc::new(MemoryStorage::new());
        let store = AccountStore::new(storage.clone());
        (storage, store)
    }

    fn saved_json(storage: &MemoryStorage) -> serde_json::Value {
        let raw = storage.get(ACCOUNTS_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    fn ids(store: &AccountStore) -> Vec<String> {
        store.accounts().iter().map(|a| a.id.clone()).collect()
    }

    fn login_patch(login: &str) -> AccountFormPatch {
        AccountFormPatch {
            login: Some(login.to_string()),
            ..AccountFormPatch::default()
        }
    }

    /// 可读取预置数据，但写入总是失败的存储
    struct FailingStorage(MemoryStorage);

    impl KeyValueStore for FailingStorage {
        fn get(&self, key: &str) -> CoreResult<Option<String>> {
            self.0.get(key)
        }

        fn set(&self, _key: &str, _value: &str) -> CoreResult<()> {
            Err(CoreError::StorageError("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> CoreResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_add_account_defaults_and_metka_scenario() {
        let (storage, store) = empty_store();
        assert!(store.is_empty());

        let account = store.add_account().unwrap();
        assert_eq!(account.form_data.account_type, AccountType::Local);
        assert_eq!(account.form_data.login, "");
        assert_eq!(account.form_data.metka_raw, "");
        assert_eq!(account.form_data.password.as_deref(), Some(""));
        assert!(account.errors.is_empty());
        assert!(account.metka.is_empty());
        assert_eq!(saved_json(&storage)[0]["id"], account.id.as_str());

        assert!(store
            .update_metka(&account.id, vec![MetkaItem::new("vip")])
            .unwrap());
        assert_eq!(
            saved_json(&storage)[0]["metka"],
            serde_json::json!([{"text": "vip"}])
        );
    }

    #[test]
    fn test_ids_are_unique_and_order_is_kept() {
        let (_, store) = empty_store();
        let created: Vec<String> = (0..50)
            .map(|_| store.add_account().unwrap().id)
            .collect();

        let unique: HashSet<_> = created.iter().collect();
        assert_eq!(unique.len(), 50);
        assert_eq!(ids(&store), created);
    }

    #[test]
    fn test_update_account_only_touches_given_field() {
        let (_, store) = empty_store();
        let first = store.add_account().unwrap();
        let second = store.add_account().unwrap();

        let errors = AccountErrors {
            password: Some("too short".to_string()),
            ..AccountErrors::default()
        };
        store.update_errors(&first.id, errors.clone()).unwrap();
        store
            .update_metka(&first.id, vec![MetkaItem::new("a")])
            .unwrap();
        let before = store.find_by_id(&first.id).unwrap();

        assert!(store.update_account(&first.id, login_patch("x")).unwrap());

        let after = store.find_by_id(&first.id).unwrap();
        assert_eq!(after.form_data.login, "x");
        assert_eq!(after.form_data.metka_raw, before.form_data.metka_raw);
        assert_eq!(after.form_data.account_type, before.form_data.account_type);
        assert_eq!(after.form_data.password, before.form_data.password);
        assert_eq!(after.errors, errors);
        assert_eq!(after.metka, before.metka);
        assert_eq!(store.find_by_id(&second.id).unwrap(), second);
    }

    #[test]
    fn test_update_errors_replaces_wholesale() {
        let (storage, store) = empty_store();
        let account = store.add_account().unwrap();

        store
            .update_errors(
                &account.id,
                AccountErrors {
                    login: Some("required".to_string()),
                    metka: Some("too long".to_string()),
                    ..AccountErrors::default()
                },
            )
            .unwrap();
        store
            .update_errors(
                &account.id,
                AccountErrors {
                    password: Some("required".to_string()),
                    ..AccountErrors::default()
                },
            )
            .unwrap();

        assert_eq!(
            saved_json(&storage)[0]["errors"],
            serde_json::json!({"password": "required"})
        );
    }

    #[test]
    fn test_missing_id_is_a_noop() {
        let (storage, store) = empty_store();
        store.add_account().unwrap();
        let before = store.accounts();
        let saved_before = storage.get(ACCOUNTS_KEY).unwrap();

        assert!(!store.update_account("missing", login_patch("x")).unwrap());
        assert!(!store
            .update_errors("missing", AccountErrors::default())
            .unwrap());
        assert!(!store
            .update_metka("missing", vec![MetkaItem::new("t")])
            .unwrap());
        assert!(!store.delete_account("missing").unwrap());

        assert_eq!(*store.accounts(), *before);
        assert_eq!(storage.get(ACCOUNTS_KEY).unwrap(), saved_before);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let storage = Arc::new(MemoryStorage::new().with_entry(
            ACCOUNTS_KEY,
            serde_json::to_string(&vec![Account::new("a"), Account::new("b"), Account::new("c")])
                .unwrap(),
        ));
        let store = AccountStore::new(storage.clone());

        assert!(store.delete_account("b").unwrap());
        assert_eq!(ids(&store), vec!["a", "c"]);

        let saved: Vec<Account> =
            serde_json::from_str(&storage.get(ACCOUNTS_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(saved, *store.accounts());
    }

    #[test]
    fn test_delete_missing_still_writes() {
        let (storage, store) = empty_store();
        assert_eq!(storage.get(ACCOUNTS_KEY).unwrap(), None);

        assert!(!store.delete_account("nothing").unwrap());
        assert_eq!(storage.get(ACCOUNTS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_reload_round_trip() {
        let (storage, store) = empty_store();
        let account = store.add_account().unwrap();
        store
            .update_account(
                &account.id,
                AccountFormPatch {
                    account_type: Some(AccountType::Ldap),
                    password: Some(None),
                    ..login_patch("admin")
                },
            )
            .unwrap();
        store
            .update_metka(&account.id, vec![MetkaItem::new("a"), MetkaItem::new("b")])
            .unwrap();
        store.add_account().unwrap();

        let reloaded = AccountStore::new(storage);
        assert_eq!(*reloaded.accounts(), *store.accounts());
        assert_eq!(reloaded.find_by_id(&account.id).unwrap().form_data.password, None);
    }

    #[test]
    fn test_corrupt_storage_loads_empty() {
        for raw in [
            "{}",
            "not json",
            "42",
            "null",
            r#""accounts""#,
            "[]",
            // 每个元素都不合法时同样为空
            r#"[{"id": 1}]"#,
            r#"[{"id": "a", "formData": {"type": "admin"}}]"#,
        ] {
            let storage = Arc::new(MemoryStorage::new().with_entry(ACCOUNTS_KEY, raw));
            let store = AccountStore::new(storage);
            assert!(store.is_empty(), "expected empty store for {raw}");
        }
    }

    #[test]
    fn test_malformed_element_does_not_drop_valid_ones() {
        let mut keep = serde_json::to_value(Account::new("keep")).unwrap();
        keep["metka"] = serde_json::json!([{"text": "vip"}]);
        let raw = serde_json::json!([keep, {"id": "odd", "formData": {"type": "local"}}]);

        let storage =
            Arc::new(MemoryStorage::new().with_entry(ACCOUNTS_KEY, raw.to_string()));
        let store = AccountStore::new(storage.clone());
        assert_eq!(ids(&store), vec!["keep"]);
        assert_eq!(
            store.find_by_id("keep").unwrap().metka,
            vec![MetkaItem::new("vip")]
        );

        let added = store.add_account().unwrap();
        let saved: Vec<Account> =
            serde_json::from_str(&storage.get(ACCOUNTS_KEY).unwrap().unwrap()).unwrap();
        let saved_ids: Vec<_> = saved.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(saved_ids, vec!["keep", added.id.as_str()]);
    }

    #[test]
    fn test_cleared_storage_resets_on_next_load() {
        let (storage, store) = empty_store();
        store.add_account().unwrap();
        storage.remove(ACCOUNTS_KEY).unwrap();

        assert!(AccountStore::new(storage).is_empty());
    }

    #[test]
    fn test_write_failure_keeps_memory_unchanged() {
        let store = AccountStore::new(Arc::new(FailingStorage(MemoryStorage::new())));

        let err = store.add_account().unwrap_err();
        assert!(matches!(err, CoreError::StorageError(_)));
        assert!(store.is_empty());

        assert!(store.delete_account("a").is_err());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_failed_update_keeps_account_unchanged() {
        let seeded = MemoryStorage::new().with_entry(
            ACCOUNTS_KEY,
            serde_json::to_string(&vec![Account::new("a"), Account::new("b")]).unwrap(),
        );
        let store = AccountStore::new(Arc::new(FailingStorage(seeded)));
        let before = store.find_by_id("a").unwrap();

        let err = store.update_account("a", login_patch("x")).unwrap_err();
        assert!(matches!(err, CoreError::StorageError(_)));

        let err = store
            .update_errors(
                "a",
                AccountErrors {
                    login: Some("required".to_string()),
                    ..AccountErrors::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, CoreError::StorageError(_)));

        let err = store
            .update_metka("a", vec![MetkaItem::new("vip")])
            .unwrap_err();
        assert!(matches!(err, CoreError::StorageError(_)));

        assert!(store.delete_account("a").is_err());

        assert_eq!(store.find_by_id("a").unwrap(), before);
        assert_eq!(ids(&store), vec!["a", "b"]);
    }
}
