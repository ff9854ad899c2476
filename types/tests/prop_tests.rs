use proptest::prelude::*;

use meridian_types::{AccountId, Alias, NftId, TokenId};

proptest! {
    /// AccountId display/parse roundtrip.
    #[test]
    fn account_id_display_parse_roundtrip(
        shard in 0u64..1_000,
        realm in 0u64..1_000,
        num in 0u64..u64::MAX,
    ) {
        let id = AccountId::new(shard, realm, num);
        let parsed: AccountId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }

    /// TokenId display/parse roundtrip.
    #[test]
    fn token_id_display_parse_roundtrip(
        shard in 0u64..1_000,
        realm in 0u64..1_000,
        num in 0u64..u64::MAX,
    ) {
        let id = TokenId::new(shard, realm, num);
        let parsed: TokenId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }

    /// is_set is false only for the all-zero id.
    #[test]
    fn account_id_is_set_correct(
        shard in 0u64..10,
        realm in 0u64..10,
        num in 0u64..10,
    ) {
        let id = AccountId::new(shard, realm, num);
        prop_assert_eq!(id.is_set(), (shard, realm, num) != (0, 0, 0));
    }

    /// AccountId bincode serialization roundtrip.
    #[test]
    fn account_id_bincode_roundtrip(
        shard in 0u64..u64::MAX,
        realm in 0u64..u64::MAX,
        num in 0u64..u64::MAX,
    ) {
        let id = AccountId::new(shard, realm, num);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: AccountId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// NftId bincode serialization roundtrip.
    #[test]
    fn nft_id_bincode_roundtrip(num in 0u64..u64::MAX, serial in 1u64..u64::MAX) {
        let id = NftId::new(TokenId::new(0, 0, num), serial);
        let encoded = bincode::serialize(&id).unwrap();
        let decoded: NftId = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, id);
    }

    /// Alias hex display has exactly two characters per byte.
    #[test]
    fn alias_hex_length(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let alias = Alias::new(bytes.clone());
        prop_assert_eq!(alias.to_string().len(), bytes.len() * 2);
        prop_assert_eq!(alias.is_empty(), bytes.is_empty());
    }

    /// Alias bincode roundtrip preserves the exact bytes.
    #[test]
    fn alias_bincode_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let alias = Alias::new(bytes.clone());
        let encoded = bincode::serialize(&alias).unwrap();
        let decoded: Alias = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded.as_bytes(), bytes.as_slice());
    }

    /// Ids order first by shard, then realm, then num.
    #[test]
    fn account_id_ordering_is_lexicographic(
        a in 0u64..100, b in 0u64..100, c in 0u64..100,
        d in 0u64..100, e in 0u64..100, f in 0u64..100,
    ) {
        let x = AccountId::new(a, b, c);
        let y = AccountId::new(d, e, f);
        prop_assert_eq!(x.cmp(&y), (a, b, c).cmp(&(d, e, f)));
    }
}
