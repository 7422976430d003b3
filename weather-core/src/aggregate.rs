//! Fan-out over several providers, answering with their mean.

use async_trait::async_trait;

use crate::{
    Config, WeatherError,
    provider::{ProviderId, TemperatureProvider, provider_from_config},
};

/// A provider composed of other providers.
///
/// Members are queried one after another, in construction order. The first
/// failure aborts the call and is returned unchanged; remaining members are
/// not queried. There is no per-member timeout, so one hanging upstream
/// stalls the whole call.
///
/// Since `Aggregator` is itself a [`TemperatureProvider`], aggregators nest.
#[derive(Debug)]
pub struct Aggregator {
    providers: Vec<Box<dyn TemperatureProvider>>,
}

impl Aggregator {
    /// Fails with [`WeatherError::NoProviders`] when `providers` is empty.
    pub fn new(providers: Vec<Box<dyn TemperatureProvider>>) -> Result<Self, WeatherError> {
        if providers.is_empty() {
            return Err(WeatherError::NoProviders);
        }
        Ok(Self { providers })
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[async_trait]
impl TemperatureProvider for Aggregator {
    async fn temperature(&self, city: &str) -> anyhow::Result<f64> {
        let mut sum = 0.0;
        for provider in &self.providers {
            sum += provider.temperature(city).await?;
        }

        let mean = sum / self.providers.len() as f64;
        tracing::debug!(city, providers = self.providers.len(), mean, "aggregated temperature");

        Ok(mean)
    }
}

/// Build an aggregator over every provider that has credentials in `config`,
/// in [`ProviderId::all`] order.
pub fn aggregator_from_config(config: &Config) -> anyhow::Result<Aggregator> {
    let providers = ProviderId::all()
        .iter()
        .filter(|id| config.is_provider_configured(**id))
        .map(|id| provider_from_config(*id, config))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Aggregator::new(providers)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug)]
    struct Fixed {
        kelvin: f64,
        calls: Arc<AtomicUsize>,
    }

    impl Fixed {
        fn boxed(kelvin: f64) -> Box<dyn TemperatureProvider> {
            Self::counted(kelvin, Arc::default())
        }

        fn counted(kelvin: f64, calls: Arc<AtomicUsize>) -> Box<dyn TemperatureProvider> {
            Box::new(Self { kelvin, calls })
        }
    }

    #[async_trait]
    impl TemperatureProvider for Fixed {
        async fn temperature(&self, _city: &str) -> anyhow::Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.kelvin)
        }
    }

    #[derive(Debug)]
    struct Failing {
        message: &'static str,
        calls: Arc<AtomicUsize>,
    }

    impl Failing {
        fn counted(message: &'static str, calls: Arc<AtomicUsize>) -> Box<dyn TemperatureProvider> {
            Box::new(Self { message, calls })
        }
    }

    #[async_trait]
    impl TemperatureProvider for Failing {
        async fn temperature(&self, _city: &str) -> anyhow::Result<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(anyhow::anyhow!(self.message))
        }
    }

    #[derive(Debug, Default)]
    struct Echo {
        seen: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TemperatureProvider for Arc<Echo> {
        async fn temperature(&self, city: &str) -> anyhow::Result<f64> {
            self.seen.lock().unwrap().push(city.to_string());
            Ok(0.0)
        }
    }

    #[tokio::test]
    async fn mean_of_three_providers() {
        let agg =
            Aggregator::new(vec![Fixed::boxed(280.0), Fixed::boxed(290.0), Fixed::boxed(300.0)])
                .unwrap();

        assert_eq!(agg.temperature("berlin").await.unwrap(), 290.0);
    }

    #[tokio::test]
    async fn mean_does_not_depend_on_order() {
        let values = [271.3, 288.9, 301.25, 279.05];
        let forward = Aggregator::new(values.iter().map(|v| Fixed::boxed(*v)).collect()).unwrap();
        let backward =
            Aggregator::new(values.iter().rev().map(|v| Fixed::boxed(*v)).collect()).unwrap();

        let a = forward.temperature("x").await.unwrap();
        let b = backward.temperature("x").await.unwrap();
        let expected = values.iter().sum::<f64>() / values.len() as f64;

        assert!((a - b).abs() < 1e-9);
        assert!((a - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn single_provider_is_passed_through() {
        let agg = Aggregator::new(vec![Fixed::boxed(263.7)]).unwrap();
        assert_eq!(agg.temperature("reykjavik").await.unwrap(), 263.7);
    }

    #[tokio::test]
    async fn first_error_stops_the_loop() {
        let failing_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));
        let third_calls = Arc::new(AtomicUsize::new(0));

        let agg = Aggregator::new(vec![
            Failing::counted("network unreachable", failing_calls.clone()),
            Fixed::counted(290.0, second_calls.clone()),
            Fixed::counted(300.0, third_calls.clone()),
        ])
        .unwrap();

        let err = agg.temperature("lima").await.unwrap_err();

        assert_eq!(err.to_string(), "network unreachable");
        assert_eq!(failing_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
        assert_eq!(third_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn error_after_successes_is_reported() {
        let earlier = Arc::new(AtomicUsize::new(0));
        let later = Arc::new(AtomicUsize::new(0));

        let agg = Aggregator::new(vec![
            Fixed::counted(290.0, earlier.clone()),
            Failing::counted("bad body", Arc::default()),
            Failing::counted("should not be seen", later.clone()),
        ])
        .unwrap();

        let err = agg.temperature("lima").await.unwrap_err();

        assert_eq!(err.to_string(), "bad body");
        assert_eq!(earlier.load(Ordering::SeqCst), 1);
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_aggregator_is_rejected() {
        let err = Aggregator::new(Vec::new()).unwrap_err();
        assert_eq!(err, WeatherError::NoProviders);
        assert_eq!(err.to_string(), "no providers configured");
    }

    #[tokio::test]
    async fn aggregators_nest() {
        let inner = Aggregator::new(vec![Fixed::boxed(280.0), Fixed::boxed(300.0)]).unwrap();
        let outer = Aggregator::new(vec![Box::new(inner), Fixed::boxed(296.0)]).unwrap();

        assert_eq!(outer.temperature("cairo").await.unwrap(), 293.0);
    }

    #[tokio::test]
    async fn city_is_forwarded_verbatim() {
        let echo = Arc::new(Echo::default());
        let agg = Aggregator::new(vec![Box::new(echo.clone())]).unwrap();

        agg.temperature("new%20york").await.unwrap();

        assert_eq!(*echo.seen.lock().unwrap(), vec!["new%20york".to_string()]);
    }

    #[test]
    fn from_config_without_keys_fails() {
        let err = aggregator_from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("no providers configured"));
    }

    #[test]
    fn from_config_uses_only_configured_providers() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::WeatherApi, "KEY".into());

        let agg = aggregator_from_config(&cfg).unwrap();
        assert_eq!(agg.len(), 1);

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY2".into());
        assert_eq!(aggregator_from_config(&cfg).unwrap().len(), 2);
    }
}
