#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, Timelike};
    use proptest::prelude::*;

    use praytime::{
        easy::EasyTimes24, AsrMethod, CalculationMethod, DateInput, DayTimes, HighLatRule, Location,
        PrayerTime, PrayerTimes, Rounding, Settings, TimeFormat, TimeName, TimeValue, Tune,
        UtcOffset, INVALID_TIME,
    };

    fn engine(method: CalculationMethod, lat: f64, lng: f64, utc: f64) -> PrayerTimes {
        PrayerTimes::with_settings(
            Settings::new(method)
                .with_location(Location::new(lat, lng))
                .with_utc_offset(UtcOffset::Hours(utc)),
        )
    }

    fn mecca() -> PrayerTimes {
        engine(CalculationMethod::MWL, 21.4225, 39.8262, 3.0)
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn at(day: &DayTimes, name: TimeName) -> chrono::DateTime<chrono::FixedOffset> {
        day.get(name)
            .instant()
            .unwrap_or_else(|| panic!("{name} is invalid on {}", day.date()))
    }

    /// minutes since local midnight, from any text format
    fn parse_minutes(value: &TimeValue) -> u32 {
        match value {
            TimeValue::Hours(h) => (h * 60.0).round() as u32,
            TimeValue::Text(text) => {
                let clock = text.split('T').last().unwrap();
                let (clock, pm) = match clock.split_once(' ') {
                    Some((clock, suffix)) => (clock, Some(suffix == "PM")),
                    None => (clock, None),
                };
                let mut parts = clock.split(':');
                let hours: u32 = parts.next().unwrap().parse().unwrap();
                let minutes: u32 = parts.next().unwrap().parse().unwrap();
                let hours = match pm {
                    Some(pm) => hours % 12 + if pm { 12 } else { 0 },
                    None => hours,
                };
                hours * 60 + minutes
            }
            TimeValue::Invalid => panic!("invalid time"),
        }
    }

    #[test]
    fn mecca_mwl_reference_day() {
        let table = mecca().times(DateInput::calendar(2024, 3, 11)).unwrap();
        let expected = [
            (TimeName::Imsak, "05:09"),
            (TimeName::Fajr, "05:19"),
            (TimeName::Sunrise, "06:33"),
            (TimeName::Dhuhr, "12:31"),
            (TimeName::Asr, "15:54"),
            (TimeName::Sunset, "18:29"),
            (TimeName::Maghrib, "18:30"),
            (TimeName::Isha, "19:38"),
            (TimeName::Midnight, "00:31"),
        ];
        for (name, value) in expected {
            assert_eq!(table.get(name).to_string(), value, "{name}");
        }
    }

    #[test]
    fn mecca_uses_mwl_angles() {
        let pt = mecca();
        assert_eq!(pt.settings().params.fajr, 18.0);
        assert_eq!(
            pt.settings().params.isha,
            praytime::Twilight::Angle(17.0)
        );
        // a shallower fajr angle must give a later fajr
        let mut isna = mecca();
        isna.set_method(CalculationMethod::ISNA);
        let d = date(2024, 3, 11);
        let mwl = pt.compute(d).unwrap();
        let isna = isna.compute(d).unwrap();
        assert!(at(&isna, TimeName::Fajr) > at(&mwl, TimeName::Fajr));
        assert!(at(&isna, TimeName::Isha) < at(&mwl, TimeName::Isha));
    }

    #[test]
    fn equator_equinox_noon() {
        let mut pt = engine(CalculationMethod::Egypt, 0.0, 0.0, 0.0);
        pt.set_rounding(Rounding::None);
        let day = pt.compute(date(2024, 3, 20)).unwrap();
        let dhuhr = at(&day, TimeName::Dhuhr);
        let minutes = dhuhr.hour() as f64 * 60.0 + dhuhr.minute() as f64;
        // equation of time is about -7.5 minutes on this date
        assert!((minutes - 727.0).abs() <= 1.0, "dhuhr at {dhuhr}");
        assert!((minutes - 720.0).abs() < 15.0);
    }

    #[test]
    fn method_does_not_move_dhuhr() {
        let d = date(2024, 9, 22);
        let noon = |method| {
            let day = engine(method, 0.0, 0.0, 0.0).compute(d).unwrap();
            at(&day, TimeName::Dhuhr)
        };
        for method in CalculationMethod::ALL {
            assert_eq!(noon(method), noon(CalculationMethod::MWL));
        }
    }

    #[test]
    fn unresolvable_angle_without_rule_is_invalid() {
        let mut pt = engine(CalculationMethod::MWL, 60.0, 10.0, 2.0);
        pt.set_high_lat_rule(HighLatRule::None);
        let table = pt.times(DateInput::calendar(2024, 6, 21)).unwrap();
        assert_eq!(table.get(TimeName::Fajr).to_string(), INVALID_TIME);
        assert_eq!(table.get(TimeName::Isha).to_string(), INVALID_TIME);
        assert_eq!(table.get(TimeName::Imsak).to_string(), INVALID_TIME);
        for name in [TimeName::Sunrise, TimeName::Dhuhr, TimeName::Asr, TimeName::Sunset] {
            assert!(table.get(name).is_valid(), "{name}");
        }
    }

    #[test]
    fn polar_day_leaves_rise_and_set_invalid() {
        // the sun never sets at 70N around the June solstice, so there is
        // no night to apportion
        let pt = engine(CalculationMethod::MWL, 70.0, 20.0, 2.0);
        let table = pt.times(DateInput::calendar(2024, 6, 21)).unwrap();
        for name in [TimeName::Sunrise, TimeName::Sunset, TimeName::Fajr, TimeName::Isha] {
            assert!(!table.get(name).is_valid(), "{name}");
        }
        assert!(table.get(TimeName::Dhuhr).is_valid());
        assert!(table.get(TimeName::Asr).is_valid());
    }

    #[test]
    fn night_middle_fills_short_nights() {
        let mut pt = engine(CalculationMethod::MWL, 62.0, 10.0, 2.0);
        pt.set_high_lat_rule(HighLatRule::NightMiddle)
            .set_rounding(Rounding::None);
        let day = pt.compute(date(2024, 6, 21)).unwrap();
        let sunset = at(&day, TimeName::Sunset);
        let sunrise = at(&day, TimeName::Sunrise);
        let fajr = at(&day, TimeName::Fajr);
        let isha = at(&day, TimeName::Isha);
        assert!(isha > sunset && isha < sunrise + Duration::days(1));
        assert!(fajr < sunrise && fajr > sunset - Duration::days(1));
        // both pinned to the middle of the same night length
        let gap = (isha - fajr - Duration::days(1)).num_milliseconds().abs();
        assert!(gap <= 2, "gap {gap}ms");
    }

    #[test]
    fn other_rules_stay_closer_to_the_horizon() {
        let d = date(2024, 6, 21);
        let fajr = |rule| {
            let mut pt = engine(CalculationMethod::MWL, 58.0, 10.0, 2.0);
            pt.set_high_lat_rule(rule);
            at(&pt.compute(d).unwrap(), TimeName::Fajr)
        };
        let middle = fajr(HighLatRule::NightMiddle);
        let seventh = fajr(HighLatRule::OneSeventh);
        let angle = fajr(HighLatRule::AngleBased);
        // 1/7 < 18/60 < 1/2 of the night before sunrise
        assert!(middle < angle && angle < seventh);
    }

    #[test]
    fn tuning_fajr_moves_only_fajr() {
        let d = date(2024, 3, 11);
        let plain = mecca().times(d).unwrap();
        let mut tuned = mecca();
        tuned.set_tune(Tune::new().with(TimeName::Fajr, 5));
        let tuned = tuned.times(d).unwrap();
        assert_eq!(tuned.get(TimeName::Fajr).to_string(), "05:24");
        for name in TimeName::ALL {
            if name != TimeName::Fajr {
                assert_eq!(tuned.get(name), plain.get(name), "{name}");
            }
        }
    }

    #[test]
    fn negative_tuning() {
        let mut pt = mecca();
        pt.set_tune(Tune::new().with(TimeName::Isha, -3).with(TimeName::Dhuhr, 2));
        let table = pt.times(DateInput::calendar(2024, 3, 11)).unwrap();
        assert_eq!(table.get(TimeName::Isha).to_string(), "19:35");
        assert_eq!(table.get(TimeName::Dhuhr).to_string(), "12:33");
    }

    #[test]
    fn hanafi_asr_waits_for_a_longer_shadow() {
        let d = date(2024, 3, 11);
        let standard = mecca().compute(d).unwrap();
        let mut pt = mecca();
        pt.set_asr_method(AsrMethod::Hanafi);
        let hanafi = pt.compute(d).unwrap();
        assert!(at(&hanafi, TimeName::Asr) > at(&standard, TimeName::Asr));
        assert_eq!(pt.times(d).unwrap().get(TimeName::Asr).to_string(), "16:49");
        for name in TimeName::ALL {
            if name != TimeName::Asr {
                assert_eq!(hanafi.get(name), standard.get(name), "{name}");
            }
        }
    }

    #[test]
    fn elevation_widens_the_day() {
        let d = date(2024, 3, 11);
        let mut ground = mecca();
        ground.set_location(21.4225, 39.8262, 0.0);
        let mut hill = mecca();
        hill.set_location(21.4225, 39.8262, 1000.0);
        let ground = ground.times(d).unwrap();
        let hill = hill.times(d).unwrap();
        assert_eq!(ground.get(TimeName::Sunrise).to_string(), "06:33");
        assert_eq!(hill.get(TimeName::Sunrise).to_string(), "06:28");
        assert_eq!(ground.get(TimeName::Sunset).to_string(), "18:29");
        assert_eq!(hill.get(TimeName::Sunset).to_string(), "18:34");
        assert_eq!(hill.get(TimeName::Dhuhr), ground.get(TimeName::Dhuhr));
    }

    #[test]
    fn rounding_down_truncates_seconds() {
        let d = date(2024, 3, 11);
        let mut pt = mecca();
        pt.set_rounding(Rounding::Down);
        let down = pt.times(d).unwrap();
        let nearest = mecca().times(d).unwrap();
        // fajr falls at 05:18:52, dhuhr at 12:30:35
        assert_eq!(down.get(TimeName::Fajr).to_string(), "05:18");
        assert_eq!(nearest.get(TimeName::Fajr).to_string(), "05:19");
        assert_eq!(down.get(TimeName::Dhuhr).to_string(), "12:30");
        assert_eq!(nearest.get(TimeName::Dhuhr).to_string(), "12:31");

        let day = pt.compute(d).unwrap();
        for name in TimeName::ALL {
            assert_eq!(at(&day, name).second(), 0, "{name}");
        }
    }

    #[test]
    fn iso_format_rolls_the_date() {
        let mut pt = mecca();
        pt.set_time_format(TimeFormat::Iso8601);
        let table = pt.times(DateInput::calendar(2024, 3, 11)).unwrap();
        assert_eq!(
            table.get(TimeName::Fajr).to_string(),
            "2024-03-11T05:19:00+03:00"
        );
        assert_eq!(
            table.get(TimeName::Midnight).to_string(),
            "2024-03-12T00:31:00+03:00"
        );
    }

    #[test]
    fn auto_offset_follows_dst() {
        let mut pt = PrayerTimes::new(CalculationMethod::ISNA);
        pt.set_location(40.7128, -74.0060, 10.0)
            .set_timezone(chrono_tz::America::New_York);
        let before = pt.compute(date(2024, 3, 9)).unwrap();
        let after = pt.compute(date(2024, 3, 10)).unwrap();
        let offset = |day: &DayTimes| at(day, TimeName::Dhuhr).offset().local_minus_utc();
        assert_eq!(offset(&before), -5 * 3600);
        assert_eq!(offset(&after), -4 * 3600);
        let shift = at(&after, TimeName::Dhuhr).time() - at(&before, TimeName::Dhuhr).time();
        assert!((shift.num_minutes() - 60).abs() <= 1);
    }

    #[test]
    fn get_times_applies_dst_for_the_call_only() {
        let pt = PrayerTimes::new(CalculationMethod::MWL);
        let table = pt
            .get_times(
                date(2024, 7, 1),
                Some(Location::new(48.85, 2.35)),
                UtcOffset::Hours(1.0),
                1.0,
                TimeFormat::H24,
            )
            .unwrap();
        let dhuhr = parse_minutes(table.get(TimeName::Dhuhr));
        // solar noon in Paris is near 13:55 in summer time
        assert!((dhuhr as i32 - 13 * 60 - 55).abs() <= 3, "{dhuhr}");
        assert_eq!(pt.settings().location, Location::default());
        assert_eq!(pt.settings().format, TimeFormat::H24);
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let pt = mecca();
        for (y, m, d) in [(2023, 2, 29), (2024, 13, 1), (2024, 4, 31), (2024, 0, 10)] {
            assert!(matches!(
                pt.times(DateInput::calendar(y, m, d)),
                Err(praytime::PrayTimeError::InvalidDate(_))
            ));
        }
    }

    #[test]
    fn serialized_table_has_every_key() {
        let table = mecca().times(DateInput::calendar(2024, 3, 11)).unwrap();
        let json = serde_json::to_value(&table).unwrap();
        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 9);
        for name in TimeName::ALL {
            assert!(object[name.key()].is_string(), "{name}");
        }

        let mut pt = mecca();
        pt.set_time_format(TimeFormat::Float);
        let json = serde_json::to_value(pt.times(date(2024, 3, 11)).unwrap()).unwrap();
        assert!(json["dhuhr"].as_f64().unwrap() > 12.0);
    }

    #[test]
    fn easy_times_match_table() {
        let pt = PrayerTimes::new(CalculationMethod::MWL);
        let easy: EasyTimes24 = pt
            .get_prayer_times_easy24(2024, 3, 11, 21.4225, 39.8262, 3.0)
            .unwrap();
        assert_eq!(easy.fajr, "05:19");
        assert_eq!(easy.isha, "19:38");
    }

    #[test]
    fn next_prayer_and_iftar_countdown() {
        let day = mecca().compute(date(2024, 3, 11)).unwrap();
        let now = at(&day, TimeName::Asr) + Duration::minutes(1);
        let (name, when) = day.next_prayer(&now).unwrap();
        assert_eq!(name, TimeName::Maghrib);
        let left = day.until(TimeName::Maghrib, &now).unwrap();
        assert_eq!(when - now, left);
        assert_eq!(
            praytime::schedule::format_countdown(left),
            "02:35:00"
        );
        assert!(matches!(day.get(TimeName::Maghrib), PrayerTime::At(_)));
    }

    proptest! {
    #[test]
    fn daily_order(lat in -65.0f64..65.0, lng in -180.0f64..180.0, days in 0i64..73000, m in 0usize..6) {
        let methods = [
            CalculationMethod::MWL,
            CalculationMethod::ISNA,
            CalculationMethod::Egypt,
            CalculationMethod::Karachi,
            CalculationMethod::Makkah,
            CalculationMethod::Singapore,
        ];
        let d = date(1900, 1, 1) + Duration::days(days);
        let mut pt = engine(methods[m], lat, lng, (lng / 15.0).round());
        pt.set_rounding(Rounding::None);
        let day = pt.compute(d).unwrap();
        let order = [
            TimeName::Fajr,
            TimeName::Sunrise,
            TimeName::Dhuhr,
            TimeName::Asr,
            TimeName::Sunset,
        ];
        for pair in order.windows(2) {
            prop_assert!(at(&day, pair[0]) < at(&day, pair[1]), "{} before {}", pair[0], pair[1]);
        }
        prop_assert!(at(&day, TimeName::Sunset) <= at(&day, TimeName::Maghrib));
        prop_assert!(at(&day, TimeName::Maghrib) < at(&day, TimeName::Isha));
    }

    #[test]
    fn formats_agree_to_the_minute(lat in -60.0f64..60.0, lng in -180.0f64..180.0, days in 0i64..36500) {
        let d = date(2000, 1, 1) + Duration::days(days);
        let mut pt = engine(CalculationMethod::MWL, lat, lng, (lng / 15.0).round());
        let reference = pt.times(d).unwrap();
        for format in [TimeFormat::H12, TimeFormat::H12NoSuffix, TimeFormat::Float, TimeFormat::Iso8601] {
            pt.set_time_format(format);
            let table = pt.times(d).unwrap();
            for name in TimeName::ALL {
                let expected = parse_minutes(reference.get(name));
                let actual = parse_minutes(table.get(name));
                if format == TimeFormat::H12NoSuffix {
                    prop_assert_eq!(actual % 720, expected % 720);
                } else {
                    prop_assert_eq!(actual, expected);
                }
            }
        }
    }

    #[test]
    fn tuning_is_isolated(lat in -60.0f64..60.0, days in 0i64..36500, minutes in -30i32..30) {
        let d = date(2000, 1, 1) + Duration::days(days);
        let mut pt = engine(CalculationMethod::MWL, lat, 30.0, 2.0);
        pt.set_rounding(Rounding::None);
        let plain = pt.compute(d).unwrap();
        pt.set_tune(Tune::new().with(TimeName::Fajr, minutes));
        let tuned = pt.compute(d).unwrap();
        let shift = at(&tuned, TimeName::Fajr) - at(&plain, TimeName::Fajr);
        prop_assert!((shift.num_milliseconds() - minutes as i64 * 60_000).abs() <= 1);
        for name in TimeName::ALL {
            if name != TimeName::Fajr {
                prop_assert_eq!(tuned.get(name), plain.get(name));
            }
        }
    }

    #[test]
    fn deterministic(lat in -65.0f64..65.0, lng in -180.0f64..180.0, days in 0i64..36500) {
        let d = date(2000, 1, 1) + Duration::days(days);
        let pt = engine(CalculationMethod::Tehran, lat, lng, 0.0);
        let first = serde_json::to_string(&pt.times(d).unwrap()).unwrap();
        let second = serde_json::to_string(&pt.times(d).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }
    }
}
