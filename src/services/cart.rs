// src/services/cart.rs

use std::sync::Arc;

use serde_json::Value;

use crate::common::error::AppError;
use crate::models::cart::CartItem;
use crate::models::product::{Product, ProductKey, RawProduct, RecordId};
use crate::models::user::User;
use crate::store::{keys, read_json, write_json, RecordStore};

// O carrinho por usuário: linhas chaveadas pelo par (produto, agricultor),
// quantidade estritamente acumulativa. Não há checkout nem esvaziamento
// neste subsistema; a linha nunca é destruída automaticamente.
pub struct CartService {
    store: Arc<dyn RecordStore>,
}

impl CartService {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    // O carrinho persistido do usuário; ausente ou ilegível vira vazio.
    pub fn cart_for(&self, user_id: &RecordId) -> Result<Vec<CartItem>, AppError> {
        Ok(read_json(self.store.as_ref(), &keys::cart(user_id))?.unwrap_or_default())
    }

    // Adiciona (ou incrementa) o item do par dado no carrinho da sessão
    // atual. Produto inexistente e sessão ausente são erros visíveis ao
    // usuário e não mudam estado nenhum.
    pub fn add_to_cart(
        &self,
        key: &ProductKey,
        catalog: &crate::services::catalog::Catalog,
    ) -> Result<CartItem, AppError> {
        // 1. Resolve o produto: lista local do agricultor primeiro, depois
        //    o instantâneo do catálogo.
        let product = self
            .resolve_product(key, catalog)?
            .ok_or(AppError::ProductNotFound)?;

        // 2. Exige sessão.
        let user: Option<User> = read_json(self.store.as_ref(), keys::CURRENT_USER)?;
        let user = user.ok_or(AppError::LoginRequired)?;

        // 3-4. Carrega o carrinho e procura a linha pela chave canônica —
        //    ids numéricos e textuais já chegam unificados pelo RecordId.
        let cart_key = keys::cart(&user.id);
        let mut cart: Vec<CartItem> =
            read_json(self.store.as_ref(), &cart_key)?.unwrap_or_default();

        let updated = match cart.iter_mut().find(|item| item.key() == *key) {
            Some(existing) => {
                existing.quantity += 1;
                existing.clone()
            }
            None => {
                let item = CartItem::first_of(key, &product);
                cart.push(item.clone());
                item
            }
        };

        // 5. Persiste o carrinho por inteiro.
        write_json(self.store.as_ref(), &cart_key, &cart)?;
        Ok(updated)
    }

    // A lista autoral do agricultor é a fonte primária; o catálogo cobre
    // produtos que só existem na listagem remota.
    fn resolve_product(
        &self,
        key: &ProductKey,
        catalog: &crate::services::catalog::Catalog,
    ) -> Result<Option<Product>, AppError> {
        let records: Vec<Value> = read_json(
            self.store.as_ref(),
            &keys::farmer_products(&key.farmer_id),
        )?
        .unwrap_or_default();

        for record in records {
            let raw = RawProduct::from_value(record);
            if RecordId::from_value(&raw.id) == key.product_id {
                return Ok(Some(raw.normalize()));
            }
        }

        Ok(catalog.find(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::models::user::{Role, User};
    use crate::services::catalog::Catalog;
    use crate::store::MemoryStore;

    fn login(store: &MemoryStore, id: i64) -> RecordId {
        let user = User {
            id: RecordId::from(id),
            username: "maria".into(),
            email: "maria@x.com".into(),
            password: "123456".into(),
            role: Role::Consumer,
            details: None,
            created_at: None,
        };
        write_json(store, keys::CURRENT_USER, &user).unwrap();
        user.id
    }

    fn seed_farmer_products(store: &MemoryStore) {
        store
            .set(
                "farmer_products_3",
                &json!([
                    { "id": 7, "name": "Manga", "price": 50, "unit": "kg",
                      "status": "available", "farmer_name": "Seu Zé" },
                ])
                .to_string(),
            )
            .unwrap();
    }

    #[test]
    fn adicionar_duas_vezes_acumula_na_mesma_linha() {
        let store = Arc::new(MemoryStore::default());
        seed_farmer_products(&store);
        let user_id = login(&store, 100);

        let cart = CartService::new(store.clone());
        let catalog = Catalog::default();
        let key = ProductKey::new(7i64, 3i64);

        cart.add_to_cart(&key, &catalog).unwrap();
        let updated = cart.add_to_cart(&key, &catalog).unwrap();
        assert_eq!(updated.quantity, 2);

        let lines = cart.cart_for(&user_id).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[0].product_name, "Manga");
        assert_eq!(lines[0].price, 50.0);
    }

    #[test]
    fn linha_nova_herda_os_ids_da_chave_pedida() {
        // O registro gravado não tem farmer_id; a linha do carrinho fica
        // com os ids da chave, senão a segunda adição duplicaria a linha.
        let store = Arc::new(MemoryStore::default());
        seed_farmer_products(&store);
        let user_id = login(&store, 100);

        let cart = CartService::new(store.clone());
        cart.add_to_cart(&ProductKey::new(7i64, 3i64), &Catalog::default())
            .unwrap();

        let lines = cart.cart_for(&user_id).unwrap();
        assert_eq!(lines[0].product_id, RecordId::from(7i64));
        assert_eq!(lines[0].farmer_id, RecordId::from(3i64));
    }

    #[test]
    fn id_numerico_e_textual_sao_a_mesma_linha() {
        let store = Arc::new(MemoryStore::default());
        seed_farmer_products(&store);
        let user_id = login(&store, 100);

        let cart = CartService::new(store.clone());
        let catalog = Catalog::default();

        cart.add_to_cart(&ProductKey::new(7i64, 3i64), &catalog).unwrap();
        cart.add_to_cart(&ProductKey::new("7", "3"), &catalog).unwrap();

        let lines = cart.cart_for(&user_id).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn carrinho_antigo_com_ids_numericos_continua_acumulando() {
        let store = Arc::new(MemoryStore::default());
        seed_farmer_products(&store);
        let user_id = login(&store, 100);

        // Linha gravada pelo cliente antigo, ids como números.
        store
            .set(
                "cart_100",
                &json!([
                    { "productId": 7, "farmerId": 3, "productName": "Manga",
                      "price": 50, "unit": "kg", "quantity": 1,
                      "farmerName": "Seu Zé",
                      "addedAt": "2024-01-01T00:00:00Z" },
                ])
                .to_string(),
            )
            .unwrap();

        let cart = CartService::new(store.clone());
        cart.add_to_cart(&ProductKey::new("7", "3"), &Catalog::default())
            .unwrap();

        let lines = cart.cart_for(&user_id).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 2);
    }

    #[test]
    fn produto_inexistente_nao_muda_estado() {
        let store = Arc::new(MemoryStore::default());
        let user_id = login(&store, 100);

        let cart = CartService::new(store.clone());
        let err = cart
            .add_to_cart(&ProductKey::new(999i64, 3i64), &Catalog::default())
            .unwrap_err();

        assert!(matches!(err, AppError::ProductNotFound));
        assert_eq!(err.user_message(), "Produto não encontrado!");
        assert!(cart.cart_for(&user_id).unwrap().is_empty());
    }

    #[test]
    fn sem_sessao_e_no_op_com_erro_visivel() {
        let store = Arc::new(MemoryStore::default());
        seed_farmer_products(&store);

        let cart = CartService::new(store.clone());
        let err = cart
            .add_to_cart(&ProductKey::new(7i64, 3i64), &Catalog::default())
            .unwrap_err();

        assert!(matches!(err, AppError::LoginRequired));
        assert!(store.keys().unwrap().iter().all(|k| !k.starts_with("cart_")));
    }

    #[test]
    fn resolve_pelo_catalogo_quando_a_lista_local_nao_tem() {
        let store = Arc::new(MemoryStore::default());
        let user_id = login(&store, 100);

        let catalog = Catalog::new(vec![
            RawProduct::from_value(json!({
                "id": 55, "farmer_id": 9, "name": "Queijo",
                "price": 30, "unit": "peça", "farmerName": "Dona Ana",
            }))
            .normalize(),
        ]);

        let cart = CartService::new(store.clone());
        let item = cart
            .add_to_cart(&ProductKey::new(55i64, 9i64), &catalog)
            .unwrap();
        assert_eq!(item.product_name, "Queijo");
        assert_eq!(item.farmer_name, "Dona Ana");

        let lines = cart.cart_for(&user_id).unwrap();
        assert_eq!(lines.len(), 1);
    }
}
