#[cfg(test)]
mod tests {
    use crate::models::{ConsistencyReport, Results, TallyTable, UserRecord, UserTable};
    use crate::validation::*;
    use crate::error::{ErrorCode, ErrorResponse};

    fn tally(entries: &[(&str, u64)]) -> TallyTable {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_user_record_layout() {
        let users: UserTable = serde_json::from_str(
            r#"{"alice": {"password": "h1", "voted": true}, "bob": {"password": "h2"}}"#,
        ).unwrap();
        assert!(users["alice"].voted);
        assert!(!users["bob"].voted, "missing flag defaults to not voted");

        let json = serde_json::to_value(UserRecord::new("h3")).unwrap();
        assert_eq!(json, serde_json::json!({"password": "h3", "voted": false}));
    }

    #[test]
    fn test_tally_layout() {
        let t: TallyTable = serde_json::from_str(r#"{"Bob": 2, "Alice": 0}"#).unwrap();
        assert_eq!(t.keys().collect::<Vec<_>>(), ["Alice", "Bob"]);
        assert!(serde_json::from_str::<TallyTable>(r#"{"Bob": -1}"#).is_err());
    }

    #[test]
    fn test_results_from_tally() {
        let results = Results::from_tally(&tally(&[("Alice", 3), ("Bob", 1), ("Charlie", 0)]));
        assert_eq!(results.total_votes, 4);
        assert_eq!(results.candidates[0].percentage, 75.0);
        assert_eq!(results.candidates[2].percentage, 0.0);
        assert_eq!(results.leaders(), ["Alice"]);
    }

    #[test]
    fn test_results_ties_and_empty() {
        let tied = Results::from_tally(&tally(&[("Alice", 2), ("Bob", 2)]));
        assert_eq!(tied.leaders(), ["Alice", "Bob"]);

        let zero = Results::from_tally(&tally(&[("Alice", 0), ("Bob", 0)]));
        assert!(zero.leaders().is_empty(), "no leader before any vote");
        assert_eq!(zero.total_votes, 0);

        assert!(Results::default().is_empty());
    }

    #[test]
    fn test_consistency_report() {
        let mut users = UserTable::new();
        users.insert("alice".into(), UserRecord { password: "h".into(), voted: true });
        users.insert("bob".into(), UserRecord { password: "h".into(), voted: true });
        users.insert("carol".into(), UserRecord::new("h"));

        let ok = ConsistencyReport::from_tables(&users, &tally(&[("Alice", 1), ("Bob", 1)]));
        assert!(ok.is_consistent());
        assert_eq!(ok.unrecorded_votes(), 0);

        let broken = ConsistencyReport::from_tables(&users, &tally(&[("Alice", 1), ("Bob", 0)]));
        assert!(!broken.is_consistent());
        assert_eq!(broken.unrecorded_votes(), 1);
    }

    #[test]
    fn test_username_validation() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("jane.doe_2").is_ok());
        assert_eq!(validate_username(""), Err(ValidationError::EmptyUsername));
        assert_eq!(validate_username("has space"), Err(ValidationError::UsernameCharacters));
        assert_eq!(
            validate_username(&"a".repeat(MAX_USERNAME_LENGTH + 1)),
            Err(ValidationError::UsernameTooLong)
        );
    }

    #[test]
    fn test_password_validation() {
        assert!(validate_password("secret1").is_ok());
        assert_eq!(validate_password("abc"), Err(ValidationError::PasswordTooShort));
        assert_eq!(
            validate_password(&"x".repeat(MAX_PASSWORD_LENGTH + 1)),
            Err(ValidationError::PasswordTooLong)
        );
    }

    #[test]
    fn test_candidate_validation() {
        assert!(validate_candidate_name("Dana").is_ok());
        assert_eq!(validate_candidate_name(""), Err(ValidationError::EmptyCandidate));
        assert_eq!(
            validate_candidate_name(&"D".repeat(MAX_CANDIDATE_LENGTH + 1)),
            Err(ValidationError::CandidateTooLong)
        );
    }

    #[test]
    fn test_error_response() {
        let response = ErrorResponse::from(ErrorCode::NotFound);
        assert_eq!(response.error, "Resource not found");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["code"], "notFound");
        assert_eq!(ErrorCode::from_status(422), ErrorCode::BadRequest);
        assert_eq!(ErrorCode::from_status(503), ErrorCode::SystemError);
    }
}
