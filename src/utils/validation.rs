use crate::models::RecommendationRequest;
use anyhow::{anyhow, Result};

/// Request bounds mirror the front-end's numeric control: N is a positive
/// integer no larger than the configured ceiling.
pub fn validate_recommendation_request(
    request: &RecommendationRequest,
    max_n: usize,
) -> Result<()> {
    if request.user_id.is_empty() {
        return Err(anyhow!("User ID cannot be empty"));
    }

    if request.num_recommendations == 0 {
        return Err(anyhow!("Number of recommendations must be greater than 0"));
    }

    if request.num_recommendations > max_n {
        return Err(anyhow!(
            "Number of recommendations too large: {} (max {})",
            request.num_recommendations,
            max_n
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request() {
        let request = RecommendationRequest::new("u1", 10);
        assert!(validate_recommendation_request(&request, 20).is_ok());
    }

    #[test]
    fn test_rejects_empty_user_id() {
        let request = RecommendationRequest::new("", 10);
        assert!(validate_recommendation_request(&request, 20).is_err());
    }

    #[test]
    fn test_rejects_zero_n() {
        let request = RecommendationRequest::new("u1", 0);
        assert!(validate_recommendation_request(&request, 20).is_err());
    }

    #[test]
    fn test_rejects_n_above_ceiling() {
        let request = RecommendationRequest::new("u1", 21);
        assert!(validate_recommendation_request(&request, 20).is_err());
        let request = RecommendationRequest::new("u1", 20);
        assert!(validate_recommendation_request(&request, 20).is_ok());
    }
}
